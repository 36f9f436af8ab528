use std::path::Path;

use crate::FileAttributes;
use crate::error::Result;
use crate::mime::ObjectType;
use crate::object::Dimensions;

/// Everything the content metadata generator needs to know about a source
/// file.
///
/// [`ObjectFile`](crate::ObjectFile) is the filesystem-backed implementation.
/// Path-derived values are infallible; values read from the file contents
/// return an error when the file is missing or unreadable.
pub trait ContentFile {
    /// Location of the file on disk; also the file's identity.
    fn path(&self) -> &Path;

    /// Returns `true` if the path points to an existing regular file.
    fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Caller-supplied resource label.
    fn label(&self) -> Option<&str>;

    /// Caller-supplied identifier, used verbatim instead of the path.
    fn relative_path(&self) -> Option<&str>;

    /// Caller-supplied MD5 checksum.
    fn provider_md5(&self) -> Option<&str>;

    /// Caller-supplied SHA-1 checksum.
    fn provider_sha1(&self) -> Option<&str>;

    /// Caller-supplied preserve/publish/shelve flags, winning over every table.
    fn file_attributes(&self) -> Option<&FileAttributes>;

    /// Filename without its (last) extension.
    fn filename_without_ext(&self) -> &str;

    /// Extension without the leading dot.
    fn extension(&self) -> Option<&str>;

    /// `{id}_{suffix}` for DPG-style names, otherwise the filename without
    /// extension.
    fn dpg_basename(&self) -> &str;

    /// The `{folder}` code for DPG-style names.
    fn dpg_folder(&self) -> Option<&str>;

    fn mimetype(&self) -> Result<&str>;

    fn object_type(&self) -> Result<ObjectType>;

    /// File size in bytes.
    fn size(&self) -> Result<u64>;

    /// Lowercase hex MD5 of the file contents.
    fn md5(&self) -> Result<&str>;

    /// Lowercase hex SHA-1 of the file contents.
    fn sha1(&self) -> Result<&str>;

    /// Pixel dimensions; `None` for non-images or when they can't be read.
    fn image_dimensions(&self) -> Result<Option<Dimensions>>;

    /// Returns `true` for images whose mimetype is in the valid-image list.
    fn is_valid_image(&self) -> Result<bool>;

    fn is_image(&self) -> Result<bool> {
        Ok(self.object_type()? == ObjectType::Image)
    }
}
