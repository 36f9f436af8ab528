//! Mimetype detection and classification.
//!
//! A file's mimetype is first guessed from its extension. Unless that guess is
//! one of the [trusted](MimeRules::trusted) mimetypes, the leading bytes of the
//! file are sniffed for a known image format, and a positive match wins over
//! the extension.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use mime_guess::mime::Mime;

use crate::consts::{FALLBACK_MIMETYPE, SNIFF_BYTES, TRUSTED_MIMETYPES, VALID_IMAGE_MIMETYPES};

/// Mimetype lists consulted while deriving file metadata.
///
/// [`Default`] gives the built-in lists; override them when loading
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeRules {
    /// Extension-derived mimetypes that are never second-guessed by sniffing.
    pub trusted: BTreeSet<String>,
    /// Image mimetypes for which pixel dimensions are reported.
    pub valid_image: BTreeSet<String>,
}
impl Default for MimeRules {
    fn default() -> Self {
        Self {
            trusted: TRUSTED_MIMETYPES.iter().map(ToString::to_string).collect(),
            valid_image: VALID_IMAGE_MIMETYPES.iter().map(ToString::to_string).collect(),
        }
    }
}
impl MimeRules {
    pub fn is_trusted(&self, mimetype: &str) -> bool {
        self.trusted.contains(mimetype)
    }

    pub fn is_valid_image(&self, mimetype: &str) -> bool {
        self.valid_image.contains(mimetype)
    }

    /// Determines the mimetype of an existing file.
    pub fn detect(&self, path: &Path) -> String {
        let guessed = guess_from_extension(path);
        if self.is_trusted(&guessed) {
            return guessed;
        }
        match sniff_image(path) {
            Some(sniffed) => sniffed.to_string(),
            None => guessed,
        }
    }
}

/// Mimetype from the file extension alone.
pub fn guess_from_extension(path: &Path) -> String {
    mime_guess::from_path(path).first_raw().unwrap_or(FALLBACK_MIMETYPE).to_string()
}

/// Mimetype of a recognized image format from the file's magic bytes.
fn sniff_image(path: &Path) -> Option<&'static str> {
    let mut head = Vec::new();
    let read = File::open(path).and_then(|file| file.take(SNIFF_BYTES).read_to_end(&mut head));
    if let Err(error) = read {
        tracing::warn!(path = %path.display(), %error, "Could not read file header for mimetype sniffing");
        return None;
    }
    image::guess_format(&head).ok().map(|format| format.to_mime_type())
}

/// The top-level media type of a mimetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Image,
    Audio,
    Video,
    Text,
    Application,
    Model,
    Font,
    /// Unknown or unparseable mimetype.
    Other,
}
impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Image => "image",
            ObjectType::Audio => "audio",
            ObjectType::Video => "video",
            ObjectType::Text => "text",
            ObjectType::Application => "application",
            ObjectType::Model => "model",
            ObjectType::Font => "font",
            ObjectType::Other => "other",
        }
    }

    /// Classifies a mimetype string; anything unparseable is [`Other`](Self::Other).
    pub fn from_mimetype(mimetype: &str) -> Self {
        let Ok(parsed) = Mime::from_str(mimetype) else {
            return ObjectType::Other;
        };
        match parsed.type_().as_str() {
            "image" => ObjectType::Image,
            "audio" => ObjectType::Audio,
            "video" => ObjectType::Video,
            "text" => ObjectType::Text,
            "application" => ObjectType::Application,
            "model" => ObjectType::Model,
            "font" => ObjectType::Font,
            _ => ObjectType::Other,
        }
    }
}
impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    // Minimal PNG signature plus an IHDR chunk header; enough for format sniffing.
    const PNG_HEAD: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[rstest]
    #[case("image/tiff", ObjectType::Image)]
    #[case("audio/mpeg", ObjectType::Audio)]
    #[case("text/plain", ObjectType::Text)]
    #[case("application/pdf", ObjectType::Application)]
    #[case("model/obj", ObjectType::Model)]
    #[case("not a mimetype", ObjectType::Other)]
    #[case("chemical/x-pdb", ObjectType::Other)]
    fn test_object_type(#[case] mimetype: &str, #[case] expected: ObjectType) {
        assert_eq!(ObjectType::from_mimetype(mimetype), expected);
    }

    #[rstest]
    #[case("a.txt", "text/plain")]
    #[case("a.tif", "image/tiff")]
    #[case("a.pdf", "application/pdf")]
    #[case("no_extension", FALLBACK_MIMETYPE)]
    fn test_guess_from_extension(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(guess_from_extension(Path::new(path)), expected);
    }

    #[test]
    fn test_detect_prefers_sniffed_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabeled.jpg");
        std::fs::File::create(&path).unwrap().write_all(PNG_HEAD).unwrap();
        assert_eq!(MimeRules::default().detect(&path), "image/png");
    }

    #[test]
    fn test_detect_trusts_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("looks_like_png.txt");
        std::fs::File::create(&path).unwrap().write_all(PNG_HEAD).unwrap();
        assert_eq!(MimeRules::default().detect(&path), "text/plain");
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(MimeRules::default().detect(&path), "text/csv");
    }

    #[test]
    fn test_default_rules() {
        let rules = MimeRules::default();
        assert!(rules.is_trusted("application/pdf"));
        assert!(!rules.is_trusted("image/tiff"));
        assert!(rules.is_valid_image("image/jp2"));
        assert!(!rules.is_valid_image("image/gif"));
    }
}
