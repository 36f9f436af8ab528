use std::collections::BTreeMap;

use cmeta_objectfile::FileAttributes;

use crate::{BundleMode, Style};

/// Prefix stripped from object identifiers when building resource ids.
pub const DRUID_PREFIX: &str = "druid:";

/// Everything that controls a single content metadata document.
///
/// ```
/// use cmeta_content::{BundleMode, Options, Style};
/// let options = Options::new("druid:ab123cd4567")
///     .with_style(Style::SimpleBook)
///     .with_bundle(BundleMode::Filename)
///     .with_exif(true);
/// assert_eq!(options.pid(), "ab123cd4567");
/// assert!(options.auto_labels);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Object identifier, written verbatim as `objectId`.
    pub druid: String,
    pub style: Style,
    pub bundle: BundleMode,
    /// Add `mimetype`/`size` attributes, computed checksums and image data.
    pub add_exif: bool,
    /// Add `preserve`/`publish`/`shelve` attributes.
    pub add_file_attributes: bool,
    /// Keep full paths in file ids instead of stripping the common directory.
    pub preserve_common_paths: bool,
    /// Use bare filenames as file ids; wins over `preserve_common_paths`.
    pub flatten_folder_structure: bool,
    /// Generate `"{Type} {n}"` labels for resources without a file label.
    pub auto_labels: bool,
    /// Mimetype → attributes overrides, consulted before the generator's
    /// tables. A `"default"` key applies to every unlisted mimetype.
    pub file_attributes: BTreeMap<String, FileAttributes>,
    /// Start the document with an XML declaration.
    pub include_root_xml: bool,
}
impl Options {
    pub fn new(druid: impl Into<String>) -> Self {
        Self {
            druid: druid.into(),
            style: Style::default(),
            bundle: BundleMode::default(),
            add_exif: false,
            add_file_attributes: false,
            preserve_common_paths: false,
            flatten_folder_structure: false,
            auto_labels: true,
            file_attributes: BTreeMap::new(),
            include_root_xml: true,
        }
    }

    /// The identifier without its `druid:` prefix.
    pub fn pid(&self) -> &str {
        self.druid.strip_prefix(DRUID_PREFIX).unwrap_or(&self.druid)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_bundle(mut self, bundle: BundleMode) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn with_exif(mut self, add_exif: bool) -> Self {
        self.add_exif = add_exif;
        self
    }

    pub fn with_file_attributes(mut self, add_file_attributes: bool) -> Self {
        self.add_file_attributes = add_file_attributes;
        self
    }

    pub fn with_preserve_common_paths(mut self, preserve: bool) -> Self {
        self.preserve_common_paths = preserve;
        self
    }

    pub fn with_flatten_folder_structure(mut self, flatten: bool) -> Self {
        self.flatten_folder_structure = flatten;
        self
    }

    pub fn with_auto_labels(mut self, auto_labels: bool) -> Self {
        self.auto_labels = auto_labels;
        self
    }

    pub fn with_file_attribute_override(mut self, mimetype: impl Into<String>, attributes: FileAttributes) -> Self {
        self.file_attributes.insert(mimetype.into(), attributes);
        self
    }

    pub fn with_root_xml(mut self, include: bool) -> Self {
        self.include_root_xml = include;
        self
    }
}
