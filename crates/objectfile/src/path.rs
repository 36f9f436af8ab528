//! Path utilities for source files.
//!
//! Extension splitting, DPG filename parsing and common-path detection. All of
//! these are purely lexical; nothing here touches the filesystem.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::consts::DPG_FILENAME_REGEX;

/// Lexically normalizes a path: `.` segments are dropped and `..` segments
/// consume the previous normal segment when there is one.
///
/// ```
/// use std::path::Path;
/// use cmeta_objectfile::path::normalize;
/// assert_eq!(normalize("/tmp/./x/../y/a.tif"), Path::new("/tmp/y/a.tif"));
/// assert_eq!(normalize("../a.tif"), Path::new("../a.tif"));
/// ```
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                },
                // Can't go above the root.
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }
    components.into_iter().collect()
}

/// The final path segment without its extension (`/a/b/page_001.tif` becomes
/// `page_001`). Only the last extension is removed.
pub fn filename_without_ext(path: impl AsRef<Path>) -> String {
    path.as_ref().file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// The extension of the final path segment, without the leading dot.
pub fn extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref().extension().map(|s| s.to_string_lossy().into_owned())
}

/// The parts of a filename following the `{id}_{folder}_{suffix}` DPG
/// convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DpgName {
    /// `{id}_{suffix}`, shared by every rendition of the same page.
    pub basename: String,
    /// The `{folder}` code.
    pub folder: String,
}

/// Parses the DPG convention out of a path's filename (extension excluded).
/// Returns `None` unless the name has exactly three non-empty
/// underscore-delimited parts.
///
/// ```
/// use cmeta_objectfile::path::dpg_name;
/// let name = dpg_name("/scans/abc_05_0001.jp2").unwrap();
/// assert_eq!(name.basename, "abc_0001");
/// assert_eq!(name.folder, "05");
/// assert!(dpg_name("/scans/abc_0001.jp2").is_none());
/// ```
pub fn dpg_name(path: impl AsRef<Path>) -> Option<DpgName> {
    let stem = filename_without_ext(path);
    let captures = DPG_FILENAME_REGEX.captures(&stem)?;
    Some(DpgName {
        basename: format!("{}_{}", &captures[1], &captures[3]),
        folder: captures[2].to_string(),
    })
}

/// Finds the deepest directory shared by every path.
///
/// Paths are compared component-wise after [`normalize`], so `/a/bc/x` and
/// `/a/b/y` share `/a` rather than the string prefix `/a/b`. Returns `None` for
/// an empty input or when the paths share no leading component.
pub fn common_path<I, P>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut common: Option<Vec<OsString>> = None;
    for path in paths {
        let path = normalize(path);
        let directory = path.parent().unwrap_or(Path::new(""));
        let components = directory.components().map(|c| c.as_os_str().to_os_string());
        common = Some(match common {
            None => components.collect(),
            Some(prefix) => prefix.into_iter().zip(components).take_while(|(a, b)| a == b).map(|(a, _)| a).collect(),
        });
    }
    common.filter(|c| !c.is_empty()).map(|c| c.iter().collect())
}

/// Builds the identifier written for a file: the path with `common` stripped
/// when it is a prefix, or only the filename when `flatten` is set.
///
/// ```
/// use std::path::Path;
/// use cmeta_objectfile::path::file_id;
/// let common = Path::new("/tmp/x");
/// assert_eq!(file_id("/tmp/x/sub/a.txt", Some(common), false), "sub/a.txt");
/// assert_eq!(file_id("/tmp/x/sub/a.txt", Some(common), true), "a.txt");
/// assert_eq!(file_id("/tmp/x/sub/a.txt", None, false), "/tmp/x/sub/a.txt");
/// ```
pub fn file_id(path: impl AsRef<Path>, common: Option<&Path>, flatten: bool) -> String {
    let path = normalize(path);
    if flatten && let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    let stripped = common.and_then(|common| path.strip_prefix(normalize(common)).ok()).unwrap_or(&path);
    stripped.to_string_lossy().into_owned()
}
