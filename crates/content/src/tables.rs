//! Lookup tables consulted while generating content metadata.
//!
//! The built-in values are available through [`Default`]; a [`Generator`](crate::Generator)
//! holds its own [`Tables`] so that loaded configuration can replace them
//! without any process-wide state.

use std::collections::{BTreeMap, BTreeSet};

use cmeta_objectfile::FileAttributes;

/// Key of the fallback entry in a mimetype → attributes mapping.
pub const DEFAULT_KEY: &str = "default";

/// Folder codes whose files always become their own resource under
/// [`BundleMode::Dpg`](crate::BundleMode::Dpg).
pub const SPECIAL_DPG_FOLDERS: &[&str] = &["31", "44", "50"];

const YES: bool = true;
const NO: bool = false;

/// Built-in `(mimetype, preserve, publish, shelve)` entries.
const FILE_ATTRIBUTES: &[(&str, bool, bool, bool)] = &[
    (DEFAULT_KEY, YES, NO, NO),
    ("image/tif", YES, NO, NO),
    ("image/tiff", YES, NO, NO),
    ("image/jp2", NO, YES, YES),
    ("image/jpeg", YES, NO, NO),
    ("image/png", YES, NO, YES),
    ("audio/wav", YES, NO, NO),
    ("audio/x-wav", YES, NO, NO),
    ("audio/mp3", NO, YES, YES),
    ("audio/mpeg", NO, YES, YES),
    ("application/pdf", YES, YES, YES),
    ("application/zip", YES, NO, NO),
    ("application/json", YES, YES, YES),
    ("plain/text", YES, YES, YES),
    ("text/plain", YES, YES, YES),
];

/// Preserve/publish/shelve flags by mimetype, with a fallback entry that is
/// always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttributeTable {
    entries: BTreeMap<String, FileAttributes>,
    fallback: FileAttributes,
}
impl Default for FileAttributeTable {
    fn default() -> Self {
        FILE_ATTRIBUTES
            .iter()
            .map(|&(mimetype, preserve, publish, shelve)| {
                (mimetype.to_string(), FileAttributes::new(preserve, publish, shelve))
            })
            .collect()
    }
}
impl FromIterator<(String, FileAttributes)> for FileAttributeTable {
    /// Builds a table from `(mimetype, attributes)` pairs. A [`DEFAULT_KEY`]
    /// pair sets the fallback; without one the built-in fallback is used.
    fn from_iter<T: IntoIterator<Item = (String, FileAttributes)>>(iter: T) -> Self {
        let mut table = Self {
            entries: BTreeMap::new(),
            fallback: FileAttributes::new(YES, NO, NO),
        };
        table.extend(iter);
        table
    }
}
impl Extend<(String, FileAttributes)> for FileAttributeTable {
    fn extend<T: IntoIterator<Item = (String, FileAttributes)>>(&mut self, iter: T) {
        for (mimetype, attributes) in iter {
            self.insert(mimetype, attributes);
        }
    }
}
impl FileAttributeTable {
    /// Adds or replaces an entry; [`DEFAULT_KEY`] replaces the fallback.
    pub fn insert(&mut self, mimetype: impl Into<String>, attributes: FileAttributes) {
        let mimetype = mimetype.into();
        if mimetype == DEFAULT_KEY {
            self.fallback = attributes;
        } else {
            self.entries.insert(mimetype, attributes);
        }
    }

    /// The entry for exactly this mimetype.
    pub fn get(&self, mimetype: &str) -> Option<&FileAttributes> {
        self.entries.get(mimetype)
    }

    pub fn fallback(&self) -> &FileAttributes {
        &self.fallback
    }

    /// The entry for this mimetype, or the fallback.
    pub fn lookup(&self, mimetype: Option<&str>) -> &FileAttributes {
        mimetype.and_then(|m| self.get(m)).unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every read-only table a [`Generator`](crate::Generator) consults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub file_attributes: FileAttributeTable,
    pub special_dpg_folders: BTreeSet<String>,
}
impl Default for Tables {
    fn default() -> Self {
        Self {
            file_attributes: FileAttributeTable::default(),
            special_dpg_folders: SPECIAL_DPG_FOLDERS.iter().map(ToString::to_string).collect(),
        }
    }
}
impl Tables {
    pub fn is_special_dpg_folder(&self, folder: Option<&str>) -> bool {
        folder.is_some_and(|folder| self.special_dpg_folders.contains(folder))
    }
}
