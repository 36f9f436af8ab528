use std::collections::HashMap;
use std::path::Path;

use cmeta_objectfile::{ContentFile, FileAttributes, path};
use exn::ResultExt;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::instrument;

use crate::bundle::{self, Objects};
use crate::error::{ErrorKind, Result, raise_for_file};
use crate::tables::{DEFAULT_KEY, Tables};
use crate::{FileSet, Options, ResourceType};

const INDENT: usize = 2;

/// Builds `contentMetadata` XML documents.
///
/// A generator owns the lookup [`Tables`] it consults, so differently
/// configured generators can coexist in one process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generator {
    tables: Tables,
}

/// A resource with its type and label already decided.
struct Classified<'a, F> {
    files: Vec<&'a F>,
    resource_type: ResourceType,
    label: Option<String>,
}

impl Generator {
    pub fn new(tables: Tables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Produces the content metadata document for `objects`.
    ///
    /// Every check that can reject the input (identifier, file list, file
    /// existence, bundling) runs before any XML is written, and every
    /// resource is classified up front.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::MissingInput`] for a blank identifier, no files, or no
    ///   resources after bundling.
    /// - [`ErrorKind::NotFound`] for a file that doesn't exist.
    /// - [`ErrorKind::InvalidConfiguration`] when `objects` doesn't fit the
    ///   bundle mode.
    /// - [`ErrorKind::MetadataExtraction`] when a required value (size,
    ///   checksum, media type) can't be read.
    #[instrument(level = "debug", skip_all, fields(druid = %options.druid, style = %options.style, bundle = %options.bundle))]
    pub fn create<F: ContentFile>(&self, options: &Options, objects: &Objects<F>) -> Result<String> {
        if options.druid.trim().is_empty() || options.pid().trim().is_empty() {
            exn::bail!(ErrorKind::MissingInput("druid"));
        }
        if objects.is_empty() {
            exn::bail!(ErrorKind::MissingInput("objects"));
        }
        if let Some(missing) = objects.iter().find(|file| !file.exists()) {
            exn::bail!(ErrorKind::NotFound(missing.path().to_path_buf()));
        }
        if options.style.is_deprecated() {
            tracing::warn!(style = %options.style, "Style is deprecated and may be removed in a future release");
        }

        let common = match options.preserve_common_paths {
            true => None,
            false => path::common_path(objects.iter().map(ContentFile::path)),
        };
        let resources = bundle::group(options.bundle, objects, &self.tables)?;
        if resources.is_empty() {
            exn::bail!(ErrorKind::MissingInput("resources"));
        }
        let resources = classify(options, resources)?;

        let xml = self.write(options, common.as_deref(), &resources)?;
        tracing::info!(druid = %options.druid, resources = resources.len(), files = objects.len(), "Generated content metadata");
        Ok(xml)
    }

    fn write<F: ContentFile>(
        &self,
        options: &Options,
        common: Option<&Path>,
        resources: &[Classified<'_, F>],
    ) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
        if options.include_root_xml {
            emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        let root = BytesStart::new("contentMetadata")
            .with_attributes([("objectId", options.druid.as_str()), ("type", options.style.content_type())]);
        emit(&mut writer, Event::Start(root))?;

        let pid = options.pid();
        for (index, resource) in resources.iter().enumerate() {
            let sequence = (index + 1).to_string();
            let id = format!("{pid}_{sequence}");
            let element = BytesStart::new("resource").with_attributes([
                ("id", id.as_str()),
                ("sequence", sequence.as_str()),
                ("type", resource.resource_type.as_str()),
            ]);
            emit(&mut writer, Event::Start(element))?;
            if let Some(label) = &resource.label {
                emit(&mut writer, Event::Start(BytesStart::new("label")))?;
                emit(&mut writer, Event::Text(BytesText::new(label)))?;
                emit(&mut writer, Event::End(BytesEnd::new("label")))?;
            }
            for file in &resource.files {
                self.write_file(&mut writer, options, common, *file)?;
            }
            emit(&mut writer, Event::End(BytesEnd::new("resource")))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("contentMetadata")))?;
        let mut xml = String::from_utf8(writer.into_inner()).or_raise(|| ErrorKind::Xml)?;
        xml.push('\n');
        Ok(xml)
    }

    fn write_file<F: ContentFile>(
        &self,
        writer: &mut Writer<Vec<u8>>,
        options: &Options,
        common: Option<&Path>,
        file: &F,
    ) -> Result<()> {
        let id = match file.relative_path() {
            Some(relative) => relative.to_string(),
            None => path::file_id(file.path(), common, options.flatten_folder_structure),
        };

        let mut element = BytesStart::new("file");
        element.push_attribute(("id", id.as_str()));
        if options.add_exif {
            element.push_attribute(("mimetype", raise_for_file(file.mimetype(), file.path())?));
            element.push_attribute(("size", raise_for_file(file.size(), file.path())?.to_string().as_str()));
        }
        if options.add_file_attributes {
            for (name, value) in self.file_attributes(options, file).pairs() {
                element.push_attribute((name, value));
            }
        }

        let mut checksums: Vec<(&str, &str)> = Vec::with_capacity(2);
        let mut dimensions = None;
        if options.add_exif {
            checksums.push(("sha1", raise_for_file(file.sha1(), file.path())?));
            checksums.push(("md5", raise_for_file(file.md5(), file.path())?));
            if raise_for_file(file.is_valid_image(), file.path())? {
                dimensions = raise_for_file(file.image_dimensions(), file.path())?;
            }
        } else {
            checksums.extend(file.provider_sha1().map(|sha1| ("sha1", sha1)));
            checksums.extend(file.provider_md5().map(|md5| ("md5", md5)));
        }

        if checksums.is_empty() && dimensions.is_none() {
            return emit(writer, Event::Empty(element));
        }
        emit(writer, Event::Start(element))?;
        for (kind, value) in checksums {
            emit(writer, Event::Start(BytesStart::new("checksum").with_attributes([("type", kind)])))?;
            emit(writer, Event::Text(BytesText::new(value)))?;
            emit(writer, Event::End(BytesEnd::new("checksum")))?;
        }
        if let Some(dimensions) = dimensions {
            let (width, height) = (dimensions.width.to_string(), dimensions.height.to_string());
            let image_data =
                BytesStart::new("imageData").with_attributes([("width", width.as_str()), ("height", height.as_str())]);
            emit(writer, Event::Empty(image_data))?;
        }
        emit(writer, Event::End(BytesEnd::new("file")))
    }

    /// Resolves preserve/publish/shelve for a file, most specific first: the
    /// file's own value, the caller's mapping for its mimetype, the caller's
    /// `default` entry, then the generator's table.
    fn file_attributes<F: ContentFile>(&self, options: &Options, file: &F) -> FileAttributes {
        if let Some(attributes) = file.file_attributes() {
            return *attributes;
        }
        let mimetype = match file.mimetype() {
            Ok(mimetype) => Some(mimetype),
            Err(error) => {
                tracing::warn!(path = %file.path().display(), %error, "Could not determine mimetype; using default file attributes");
                None
            },
        };
        mimetype
            .and_then(|mimetype| options.file_attributes.get(mimetype))
            .or_else(|| options.file_attributes.get(DEFAULT_KEY))
            .copied()
            .unwrap_or_else(|| *self.tables.file_attributes.lookup(mimetype))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).or_raise(|| ErrorKind::Xml)
}

/// Decides the type and label of every resource, numbering auto labels per
/// resource type across the whole document.
fn classify<'a, F: ContentFile>(options: &Options, resources: Vec<Vec<&'a F>>) -> Result<Vec<Classified<'a, F>>> {
    let mut counters: HashMap<ResourceType, usize> = HashMap::new();
    resources
        .into_iter()
        .map(|files| -> Result<Classified<'a, F>> {
            let set = FileSet::new(files, options.style);
            let resource_type = set.resource_type()?;
            let counter = counters.entry(resource_type).or_default();
            *counter += 1;
            let label = match set.label_from_file() {
                Some(label) => Some(label.to_string()),
                None if options.auto_labels => Some(resource_type.auto_label(*counter)),
                None => None,
            };
            Ok(Classified {
                files: set.files().to_vec(),
                resource_type,
                label,
            })
        })
        .collect()
}
