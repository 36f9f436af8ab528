use cmeta_objectfile::ContentFile;
use cmeta_objectfile::consts::THREE_DIMENSION_EXTENSIONS;

use crate::error::{Result, raise_for_file};
use crate::{ResourceType, Style};

/// The files of one resource, classified under a [`Style`].
///
/// Classification only looks at the set as a whole, so the outcome never
/// depends on which file happens to come first.
#[derive(Debug)]
pub struct FileSet<'a, F> {
    files: Vec<&'a F>,
    style: Style,
}
impl<'a, F: ContentFile> FileSet<'a, F> {
    pub fn new(files: Vec<&'a F>, style: Style) -> Self {
        Self { files, style }
    }

    pub fn files(&self) -> &[&'a F] {
        &self.files
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// The `type` attribute of this resource.
    ///
    /// # Errors
    ///
    /// When the style depends on a file's media type, returns
    /// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) for a missing
    /// file and [`ErrorKind::MetadataExtraction`](crate::error::ErrorKind::MetadataExtraction)
    /// when the type can't be determined.
    pub fn resource_type(&self) -> Result<ResourceType> {
        Ok(match self.style {
            Style::SimpleImage | Style::Map | Style::WebarchiveSeed => ResourceType::Image,
            Style::File => ResourceType::File,
            Style::Document => ResourceType::Document,
            Style::SimpleBook => match self.has_image()? {
                true => ResourceType::Page,
                false => ResourceType::Object,
            },
            Style::BookAsImage => match self.has_image()? {
                true => ResourceType::Image,
                false => ResourceType::Object,
            },
            Style::BookWithPdf => match self.has_non_image()? {
                true => ResourceType::Object,
                false => ResourceType::Page,
            },
            Style::ThreeD => match self.has_three_dimension_model() {
                true => ResourceType::ThreeD,
                false => ResourceType::File,
            },
        })
    }

    /// The first non-empty label supplied on any file.
    pub fn label_from_file(&self) -> Option<&'a str> {
        self.files.iter().copied().filter_map(ContentFile::label).find(|label| !label.trim().is_empty())
    }

    fn has_image(&self) -> Result<bool> {
        for file in &self.files {
            if is_image(*file)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn has_non_image(&self) -> Result<bool> {
        for file in &self.files {
            if !is_image(*file)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn has_three_dimension_model(&self) -> bool {
        self.files.iter().filter_map(|file| file.extension()).any(|extension| {
            THREE_DIMENSION_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(extension))
        })
    }
}

fn is_image<F: ContentFile>(file: &F) -> Result<bool> {
    raise_for_file(file.is_image(), file.path())
}
