//! Source file descriptors for content metadata generation.
//!
//! An [`ObjectFile`] wraps a path and lazily derives what the generator needs
//! to describe it: mimetype and media type, size, MD5/SHA-1 checksums, image
//! dimensions, and names parsed from the path (including the DPG
//! `{id}_{folder}_{suffix}` convention). The [`ContentFile`] trait is the
//! seam consumed by the generator, so other file sources can be plugged in.

mod attributes;
pub mod consts;
pub mod error;
pub mod mime;
mod object;
pub mod path;
mod source;

pub use crate::attributes::FileAttributes;
pub use crate::mime::{MimeRules, ObjectType};
pub use crate::object::{Dimensions, ObjectFile};
pub use crate::source::ContentFile;
