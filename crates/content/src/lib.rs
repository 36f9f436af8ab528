//! Content metadata generation.
//!
//! Turns an ordered list of source files into a `contentMetadata` XML
//! document: files are grouped into resources by a [`BundleMode`], each
//! resource is typed and labelled according to a [`Style`], and every file is
//! described with an identifier and, optionally, its size, mimetype,
//! checksums, image dimensions and preserve/publish/shelve flags.
//!
//! ```no_run
//! use cmeta_content::{ObjectFile, Objects, Options, Style, create_content_metadata};
//! # fn main() -> cmeta_content::error::Result<()> {
//! let objects = Objects::from(vec![ObjectFile::new("/scans/a.txt"), ObjectFile::new("/scans/b.txt")]);
//! let options = Options::new("druid:ab123cd4567").with_style(Style::File);
//! println!("{}", create_content_metadata(&options, &objects)?);
//! # Ok(())
//! # }
//! ```

pub mod bundle;
mod document;
pub mod error;
mod fileset;
mod options;
mod style;
pub mod tables;

pub use crate::bundle::{Objects, Resource};
pub use crate::document::Generator;
pub use crate::fileset::FileSet;
pub use crate::options::{DRUID_PREFIX, Options};
pub use crate::style::{BundleMode, ResourceType, Style};
pub use crate::tables::{FileAttributeTable, Tables};
pub use cmeta_objectfile::{ContentFile, FileAttributes, ObjectFile};

/// Generates a document with the built-in [`Tables`].
pub fn create_content_metadata<F: ContentFile>(options: &Options, objects: &Objects<F>) -> error::Result<String> {
    Generator::default().create(options, objects)
}
