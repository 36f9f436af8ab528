use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, OnceLock};

use exn::ResultExt;
use sha1::{Digest, Sha1};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::mime::{MimeRules, ObjectType};
use crate::path::{self, DpgName};
use crate::{ContentFile, FileAttributes};

const CHECKSUM_BUFFER_SIZE: usize = 1 << 20;

static DEFAULT_RULES: LazyLock<Arc<MimeRules>> = LazyLock::new(|| Arc::new(MimeRules::default()));

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}
impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}
impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Checksums {
    md5: String,
    sha1: String,
}

/// A source file on disk.
///
/// Caller-supplied attributes (label, relative path, provider checksums, file
/// attributes) are set with the `with_*` builders. Everything else is derived
/// on first access and cached for the lifetime of the value; each field has
/// its own [`OnceLock`], so a value is computed at most once even if the
/// descriptor is shared.
///
/// ```no_run
/// use cmeta_objectfile::{ContentFile, ObjectFile};
/// # fn main() -> cmeta_objectfile::error::Result<()> {
/// let file = ObjectFile::new("/scans/abc_00_0001.tif").with_label("Cover");
/// assert_eq!(file.dpg_basename(), "abc_0001");
/// println!("{} bytes, sha1 {}", file.size()?, file.sha1()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectFile {
    path: PathBuf,
    label: Option<String>,
    relative_path: Option<String>,
    provider_md5: Option<String>,
    provider_sha1: Option<String>,
    file_attributes: Option<FileAttributes>,
    rules: Arc<MimeRules>,
    // Path-derived
    filename_without_ext: OnceLock<String>,
    extension: OnceLock<Option<String>>,
    dpg: OnceLock<Option<DpgName>>,
    // Content-derived
    mimetype: OnceLock<String>,
    size: OnceLock<u64>,
    checksums: OnceLock<Checksums>,
    dimensions: OnceLock<Option<Dimensions>>,
}
impl ObjectFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: None,
            relative_path: None,
            provider_md5: None,
            provider_sha1: None,
            file_attributes: None,
            rules: Arc::clone(&DEFAULT_RULES),
            filename_without_ext: OnceLock::new(),
            extension: OnceLock::new(),
            dpg: OnceLock::new(),
            mimetype: OnceLock::new(),
            size: OnceLock::new(),
            checksums: OnceLock::new(),
            dimensions: OnceLock::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn with_provider_md5(mut self, md5: impl Into<String>) -> Self {
        self.provider_md5 = Some(md5.into());
        self
    }

    pub fn with_provider_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.provider_sha1 = Some(sha1.into());
        self
    }

    pub fn with_file_attributes(mut self, attributes: FileAttributes) -> Self {
        self.file_attributes = Some(attributes);
        self
    }

    /// Replaces the built-in [`MimeRules`].
    pub fn with_mime_rules(mut self, rules: Arc<MimeRules>) -> Self {
        self.rules = rules;
        self
    }

    /// The filename including extension.
    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The directory containing the file.
    pub fn dirname(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    fn dpg(&self) -> Option<&DpgName> {
        self.dpg.get_or_init(|| path::dpg_name(&self.path)).as_ref()
    }

    fn ensure_exists(&self) -> Result<()> {
        if !self.exists() {
            exn::bail!(ErrorKind::NotFound(self.path.clone()));
        }
        Ok(())
    }

    fn checksums(&self) -> Result<&Checksums> {
        if let Some(checksums) = self.checksums.get() {
            return Ok(checksums);
        }
        self.ensure_exists()?;
        let checksums = compute_checksums(&self.path).or_raise(|| ErrorKind::Metadata("checksum"))?;
        Ok(self.checksums.get_or_init(|| checksums))
    }
}

/// Streams the file once through both digests.
#[instrument(level = "debug")]
fn compute_checksums(path: &Path) -> Result<Checksums> {
    let file = File::open(path).map_err(ErrorKind::Io)?;
    let mut reader = BufReader::with_capacity(CHECKSUM_BUFFER_SIZE, file);
    let mut md5 = md5::Context::new();
    let mut sha1 = Sha1::new();
    loop {
        let chunk = reader.fill_buf().map_err(ErrorKind::Io)?;
        if chunk.is_empty() {
            break;
        }
        md5.consume(chunk);
        sha1.update(chunk);
        let read = chunk.len();
        reader.consume(read);
    }
    Ok(Checksums {
        md5: format!("{:x}", md5.finalize()),
        sha1: hex::encode(sha1.finalize()),
    })
}

impl ContentFile for ObjectFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    fn provider_md5(&self) -> Option<&str> {
        self.provider_md5.as_deref()
    }

    fn provider_sha1(&self) -> Option<&str> {
        self.provider_sha1.as_deref()
    }

    fn file_attributes(&self) -> Option<&FileAttributes> {
        self.file_attributes.as_ref()
    }

    fn filename_without_ext(&self) -> &str {
        self.filename_without_ext.get_or_init(|| path::filename_without_ext(&self.path))
    }

    fn extension(&self) -> Option<&str> {
        self.extension.get_or_init(|| path::extension(&self.path)).as_deref()
    }

    fn dpg_basename(&self) -> &str {
        match self.dpg() {
            Some(dpg) => &dpg.basename,
            None => self.filename_without_ext(),
        }
    }

    fn dpg_folder(&self) -> Option<&str> {
        self.dpg().map(|dpg| dpg.folder.as_str())
    }

    fn mimetype(&self) -> Result<&str> {
        if let Some(mimetype) = self.mimetype.get() {
            return Ok(mimetype);
        }
        self.ensure_exists()?;
        let mimetype = self.rules.detect(&self.path);
        Ok(self.mimetype.get_or_init(|| mimetype))
    }

    fn object_type(&self) -> Result<ObjectType> {
        Ok(ObjectType::from_mimetype(self.mimetype()?))
    }

    fn size(&self) -> Result<u64> {
        if let Some(size) = self.size.get() {
            return Ok(*size);
        }
        self.ensure_exists()?;
        let size = std::fs::metadata(&self.path).or_raise(|| ErrorKind::Metadata("size"))?.len();
        Ok(*self.size.get_or_init(|| size))
    }

    fn md5(&self) -> Result<&str> {
        Ok(&self.checksums()?.md5)
    }

    fn sha1(&self) -> Result<&str> {
        Ok(&self.checksums()?.sha1)
    }

    fn image_dimensions(&self) -> Result<Option<Dimensions>> {
        if let Some(dimensions) = self.dimensions.get() {
            return Ok(*dimensions);
        }
        if !self.is_image()? {
            return Ok(*self.dimensions.get_or_init(|| None));
        }
        let dimensions = match image::image_dimensions(&self.path) {
            Ok(dimensions) => Some(Dimensions::from(dimensions)),
            Err(error) => {
                // Formats the decoder doesn't support (e.g. JPEG 2000) land here.
                tracing::warn!(path = %self.path.display(), %error, "Could not read image dimensions");
                None
            },
        };
        Ok(*self.dimensions.get_or_init(|| dimensions))
    }

    fn is_valid_image(&self) -> Result<bool> {
        Ok(self.is_image()? && self.rules.is_valid_image(self.mimetype()?))
    }
}
