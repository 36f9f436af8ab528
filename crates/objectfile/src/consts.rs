use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// DPG filenames are `{id}_{folder}_{suffix}`, exactly three non-empty parts.
regex!(DPG_FILENAME_REGEX, r"^([^_]+)_([^_]+)_([^_]+)$");

/// Mimetypes reported from the file extension that are never second-guessed
/// by sniffing the file contents.
pub const TRUSTED_MIMETYPES: &[&str] = &["text/plain", "plain/text", "application/pdf", "text/html", "application/xml"];

/// Image mimetypes for which pixel dimensions are reported.
pub const VALID_IMAGE_MIMETYPES: &[&str] = &["image/jpeg", "image/jp2", "image/tiff", "image/tif", "image/png"];

/// File extensions (without the leading dot) recognized as 3D models.
pub const THREE_DIMENSION_EXTENSIONS: &[&str] = &["obj"];

/// Mimetype used when nothing better can be determined.
pub const FALLBACK_MIMETYPE: &str = "application/octet-stream";

/// How many leading bytes are read when sniffing image formats.
pub(crate) const SNIFF_BYTES: u64 = 64;
