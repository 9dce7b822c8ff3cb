//! Name resolution over a local administrative-geography dataset

use crate::area::Area;
use crate::dataset::{self, INDEX_FILENAME};
use crate::error::{GeoError, Result};
use crate::ngram::NgramIndex;
use crate::store::GeoStore;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Similarity floor applied when the caller gives no explicit threshold
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.3;

/// Case-fold and canonically compose a name for comparison or lookup.
///
/// Every name is passed through this before touching the store or the
/// fuzzy index; the published alias relation stores names the same way.
pub fn normalize(name: &str) -> String {
    name.to_lowercase().nfc().collect()
}

/// Handle to a local administrative-geography dataset.
///
/// Cheap to share behind a reference: resolver calls are safe from many
/// threads at once, with each thread lazily opening its own store
/// connection. The fuzzy index is loaded once, on the first fuzzy lookup.
pub struct GeoData {
    data_path: PathBuf,
    store: GeoStore,
    fuzzy: OnceCell<NgramIndex>,
}

impl GeoData {
    /// Open the dataset in `data_path`.
    ///
    /// Fails with [`GeoError::NotFound`] when the relation file is absent;
    /// download the dataset first.
    pub fn open(data_path: impl AsRef<Path>) -> Result<Self> {
        let data_path = data_path.as_ref().to_path_buf();
        let store = GeoStore::open(&data_path)?;
        Ok(Self {
            data_path,
            store,
            fuzzy: OnceCell::new(),
        })
    }

    /// Open the dataset from the default directory
    /// (`GEOADMIN_DATA_DIR`, else the user cache directory).
    pub fn from_default_dir() -> Result<Self> {
        Self::open(dataset::default_data_dir()?)
    }

    /// Download (or refresh) the dataset, then open it.
    ///
    /// See [`dataset::download`] for the refresh policy. Refreshes are not
    /// synchronized here; concurrent refreshes must be serialized by the
    /// caller, while concurrent readers are always safe.
    pub async fn download(
        destination: Option<PathBuf>,
        source: &str,
        update: bool,
    ) -> Result<Self> {
        let path = dataset::download(destination, source, update).await?;
        Self::open(path)
    }

    /// Directory holding the dataset files
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub(crate) fn store(&self) -> &GeoStore {
        &self.store
    }

    fn fuzzy_index(&self) -> Result<&NgramIndex> {
        self.fuzzy
            .get_or_try_init(|| NgramIndex::load(self.data_path.join(INDEX_FILENAME)))
    }

    /// Resolve `name` to the first exact alias match
    pub fn resolve_name(&self, name: &str) -> Result<Option<Area<'_>>> {
        self.resolve_name_all(name)?.next().transpose()
    }

    /// Every area whose alias set contains `name`, in store order.
    ///
    /// Matching ids are gathered up front (deduplicated); each `Area` row
    /// is fetched lazily as the iterator advances. Re-invoke to restart.
    pub fn resolve_name_all(&self, name: &str) -> Result<ResolveAll<'_>> {
        let normalized = normalize(name);
        let ids = self.store.area_ids_by_alias(&normalized)?;
        debug!(name = %name, candidates = ids.len(), "Resolved name against alias relation");
        Ok(ResolveAll {
            geodata: self,
            ids: ids.into_iter(),
        })
    }

    /// Approximate matches for `name`, scored in `[0, 1]`.
    ///
    /// Candidates at or above `threshold` come from the fuzzy index in
    /// descending-score order; each is materialized with a second store
    /// lookup keyed on its index entry.
    pub fn resolve_name_fuzzy(&self, name: &str, threshold: f32) -> Result<Vec<(f32, Area<'_>)>> {
        let normalized = normalize(name);
        let hits = self.fuzzy_index()?.search(&normalized, threshold);
        debug!(name = %name, hits = hits.len(), threshold, "Fuzzy index candidates");

        let mut results = Vec::with_capacity(hits.len());
        for (name_id, score) in hits {
            let row = self.store.area_by_name_id(name_id)?.ok_or_else(|| {
                GeoError::corrupt(format!("fuzzy index entry {name_id} has no row in the store"))
            })?;
            results.push((score, Area::from_row(self, row)?));
        }
        Ok(results)
    }

    /// Apply [`resolve_name`](Self::resolve_name) to each input
    /// independently, preserving input order
    pub fn resolve_names<'a, I>(&self, names: I) -> Result<Vec<Option<Area<'_>>>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve_name(name))
            .collect()
    }

    /// Apply [`resolve_name_all`](Self::resolve_name_all) to each input
    /// independently, preserving input order
    pub fn resolve_names_all<'a, I>(&self, names: I) -> Result<Vec<Vec<Area<'_>>>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve_name_all(name)?.collect())
            .collect()
    }

    /// Apply [`resolve_name_fuzzy`](Self::resolve_name_fuzzy) to each input
    /// independently, preserving input order
    pub fn resolve_names_fuzzy<'a, I>(
        &self,
        names: I,
        threshold: f32,
    ) -> Result<Vec<Vec<(f32, Area<'_>)>>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve_name_fuzzy(name, threshold))
            .collect()
    }
}

impl std::fmt::Debug for GeoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoData")
            .field("data_path", &self.data_path)
            .finish_non_exhaustive()
    }
}

/// Lazy iterator over [`GeoData::resolve_name_all`] matches
pub struct ResolveAll<'g> {
    geodata: &'g GeoData,
    ids: std::vec::IntoIter<i64>,
}

impl<'g> Iterator for ResolveAll<'g> {
    type Item = Result<Area<'g>>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(match self.geodata.store.area_by_id(id) {
            Ok(Some(row)) => Area::from_row(self.geodata, row),
            Ok(None) => Err(GeoError::corrupt(format!(
                "alias relation references missing area {id}"
            ))),
            Err(e) => Err(e),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}
