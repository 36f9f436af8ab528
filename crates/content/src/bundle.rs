//! Partitioning of source files into resources.
//!
//! Every strategy preserves input order: resources appear in the order their
//! first file was supplied, and files keep their relative order inside a
//! resource. Empty groups never survive.

use std::collections::HashMap;

use cmeta_objectfile::ContentFile;
use tracing::instrument;

use crate::BundleMode;
use crate::error::{ErrorKind, Result};
use crate::tables::Tables;

/// An ordered, non-empty group of files described as one unit.
pub type Resource<'a, F> = Vec<&'a F>;

/// The source files of an object, either flat or already grouped by the
/// caller for [`BundleMode::Prebundled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objects<F> {
    Files(Vec<F>),
    Bundles(Vec<Vec<F>>),
}
impl<F> Objects<F> {
    /// Every file, in order, regardless of grouping.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &F> + '_> {
        match self {
            Objects::Files(files) => Box::new(files.iter()),
            Objects::Bundles(bundles) => Box::new(bundles.iter().flatten()),
        }
    }

    /// Total number of files.
    pub fn len(&self) -> usize {
        match self {
            Objects::Files(files) => files.len(),
            Objects::Bundles(bundles) => bundles.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl<F> From<Vec<F>> for Objects<F> {
    fn from(files: Vec<F>) -> Self {
        Objects::Files(files)
    }
}

/// Groups `objects` into resources according to `mode`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidConfiguration`] when the shape of `objects`
/// doesn't match the mode: pre-grouped bundles are only accepted by
/// [`BundleMode::Prebundled`], which in turn requires them.
#[instrument(level = "debug", skip_all, fields(mode = %mode, files = objects.len()))]
pub fn group<'a, F: ContentFile>(
    mode: BundleMode,
    objects: &'a Objects<F>,
    tables: &Tables,
) -> Result<Vec<Resource<'a, F>>> {
    let resources: Vec<Resource<'a, F>> = match (mode, objects) {
        (BundleMode::Prebundled, Objects::Bundles(bundles)) => {
            bundles.iter().map(|bundle| bundle.iter().collect()).collect()
        },
        (BundleMode::Prebundled, Objects::Files(_)) => exn::bail!(ErrorKind::InvalidConfiguration(
            "prebundled mode requires files grouped into bundles".to_string()
        )),
        (_, Objects::Bundles(_)) => exn::bail!(ErrorKind::InvalidConfiguration(format!(
            "bundles were supplied but the bundle mode is {mode}"
        ))),
        (BundleMode::Default, Objects::Files(files)) => files.iter().map(|file| vec![file]).collect(),
        (BundleMode::Filename, Objects::Files(files)) => by_key(files.iter(), |file| file.filename_without_ext()),
        (BundleMode::Dpg, Objects::Files(files)) => dpg(files, tables),
    };
    let resources: Vec<Resource<'a, F>> = resources.into_iter().filter(|resource| !resource.is_empty()).collect();
    tracing::debug!(resources = resources.len(), "Bundled files into resources");
    Ok(resources)
}

/// Groups by DPG base name, then appends one resource for every file inside
/// a special folder.
fn dpg<'a, F: ContentFile>(files: &'a [F], tables: &Tables) -> Vec<Resource<'a, F>> {
    let is_special = |file: &F| tables.is_special_dpg_folder(file.dpg_folder());
    let mut resources = by_key(files.iter().filter(|file| !is_special(file)), |file| file.dpg_basename());
    resources.extend(files.iter().filter(|file| is_special(file)).map(|file| vec![file]));
    resources
}

/// Order-preserving grouping: resources are ordered by the first occurrence
/// of each key.
fn by_key<'a, F, K>(files: impl Iterator<Item = &'a F>, key: impl Fn(&'a F) -> K) -> Vec<Resource<'a, F>>
where
    K: Eq + std::hash::Hash,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut resources: Vec<Resource<'a, F>> = Vec::new();
    for file in files {
        let position = *positions.entry(key(file)).or_insert_with(|| {
            resources.push(Vec::new());
            resources.len() - 1
        });
        resources[position].push(file);
    }
    resources
}
