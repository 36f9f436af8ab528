use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace('-', "_")
}

/// The content type taxonomy of an object, deciding both the document type
/// and how each resource is typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// Every resource is an image.
    #[default]
    SimpleImage,
    /// Every resource is a file.
    File,
    /// Resources are pages, or objects when they contain no images.
    SimpleBook,
    /// Deprecated: resources are pages, or objects when they contain any non-image.
    BookWithPdf,
    /// Deprecated: resources are images, or objects when they contain no images.
    BookAsImage,
    /// Every resource is an image.
    Map,
    /// Resources holding a 3D model are `3d`, the rest are files.
    ThreeD,
    /// Every resource is a document.
    Document,
    /// Every resource is an image.
    WebarchiveSeed,
}
impl Style {
    pub const ALL: [Style; 9] = [
        Style::SimpleImage,
        Style::File,
        Style::SimpleBook,
        Style::BookWithPdf,
        Style::BookAsImage,
        Style::Map,
        Style::ThreeD,
        Style::Document,
        Style::WebarchiveSeed,
    ];

    /// Returns the canonical name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::SimpleImage => "simple_image",
            Style::File => "file",
            Style::SimpleBook => "simple_book",
            Style::BookWithPdf => "book_with_pdf",
            Style::BookAsImage => "book_as_image",
            Style::Map => "map",
            Style::ThreeD => "3d",
            Style::Document => "document",
            Style::WebarchiveSeed => "webarchive_seed",
        }
    }

    /// The `type` attribute of the `<contentMetadata>` root element.
    pub fn content_type(&self) -> &'static str {
        match self {
            Style::SimpleImage => "image",
            Style::File => "file",
            Style::SimpleBook | Style::BookWithPdf | Style::BookAsImage => "book",
            Style::Map => "map",
            Style::ThreeD => "3d",
            Style::Document => "document",
            Style::WebarchiveSeed => "webarchive-seed",
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Style::BookWithPdf | Style::BookAsImage)
    }
}
impl FromStr for Style {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        match Style::ALL.into_iter().find(|style| style.as_str() == sanitized) {
            Some(style) => Ok(style),
            None => exn::bail!(ErrorKind::InvalidConfiguration(format!("unknown style: {s}"))),
        }
    }
}
impl TryFrom<String> for Style {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// How source files are partitioned into resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BundleMode {
    /// One resource per file.
    #[default]
    Default,
    /// One resource per distinct filename (extension excluded).
    Filename,
    /// One resource per DPG base name; files in special folders stand alone.
    Dpg,
    /// The caller has already grouped the files.
    Prebundled,
}
impl BundleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleMode::Default => "default",
            BundleMode::Filename => "filename",
            BundleMode::Dpg => "dpg",
            BundleMode::Prebundled => "prebundled",
        }
    }
}
impl FromStr for BundleMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "default" => BundleMode::Default,
            "filename" => BundleMode::Filename,
            "dpg" => BundleMode::Dpg,
            "prebundled" => BundleMode::Prebundled,
            _ => exn::bail!(ErrorKind::InvalidConfiguration(format!("unknown bundle mode: {s}"))),
        })
    }
}
impl TryFrom<String> for BundleMode {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl Display for BundleMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Both enums travel through configuration as their canonical names.
#[cfg(feature = "serde")]
macro_rules! serde_via_str {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(|err: Error| serde::de::Error::custom(&*err))
            }
        }
    };
}
#[cfg(feature = "serde")]
serde_via_str!(Style);
#[cfg(feature = "serde")]
serde_via_str!(BundleMode);

/// The `type` attribute of a `<resource>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Image,
    File,
    Page,
    Object,
    ThreeD,
    Document,
}
impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::File => "file",
            ResourceType::Page => "page",
            ResourceType::Object => "object",
            ResourceType::ThreeD => "3d",
            ResourceType::Document => "document",
        }
    }

    /// Generated label for the `n`th resource of this type, e.g. `Page 3`.
    pub fn auto_label(&self, n: usize) -> String {
        format!("{} {n}", capitalize(self.as_str()))
    }
}
impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
