use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;

use super::error::{DataError, DataResult};
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Read-through dataset cache
// ---------------------------------------------------------------------------

type Slot = Arc<OnceCell<Arc<Dataset>>>;

static GLOBAL: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Datasets keyed by the path they were loaded from. Entries are populated on
/// first request and never invalidated; failed loads are not stored.
///
/// Each path owns its own slot. The map lock is only held to find or create a
/// slot, so a slow read of one file never blocks hits on another.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, Slot>>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance.
    pub fn global() -> &'static DatasetCache {
        &GLOBAL
    }

    /// Return the cached dataset for `path`, reading the file on a miss.
    /// Concurrent misses on the same path wait for a single read.
    pub fn get_or_load(&self, path: &Path) -> DataResult<Arc<Dataset>> {
        let slot = self.slot(path);
        if let Some(ds) = slot.get() {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }

        let dataset = slot.get_or_try_init(|| {
            let dataset = load_file(path)?;
            self.loads.fetch_add(1, Ordering::Relaxed);
            Ok::<_, DataError>(Arc::new(dataset))
        })?;
        Ok(Arc::clone(dataset))
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Dataset>> {
        self.entries
            .read()
            .get(path)
            .and_then(|slot| slot.get().cloned())
    }

    /// Number of successful file reads performed so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn slot(&self, path: &Path) -> Slot {
        let existing = self.entries.read().get(path).cloned();
        if let Some(slot) = existing {
            return slot;
        }
        Arc::clone(self.entries.write().entry(path.to_path_buf()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_file() -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(tmp, "state,year,quarter,brand,total_users,total_transaction_amount").unwrap();
        writeln!(tmp, "Goa,2020,1,Apple,10,1.5").unwrap();
        tmp
    }

    #[test]
    fn second_load_is_served_from_memory() {
        let tmp = sample_file();
        let cache = DatasetCache::new();

        let first = cache.get_or_load(tmp.path()).unwrap();
        // Rewrite the file: a cached read must not notice.
        std::fs::write(tmp.path(), "garbage").unwrap();
        let second = cache.get_or_load(tmp.path()).unwrap();

        assert_eq!(cache.load_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache = DatasetCache::new();
        let path = Path::new("/no/such/dir/data.csv");
        assert!(cache.get_or_load(path).is_err());
        assert!(cache.get(path).is_none());
        assert_eq!(cache.load_count(), 0);
    }

    #[test]
    fn failed_path_loads_once_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let cache = DatasetCache::new();
        assert!(cache.get_or_load(&path).is_err());

        std::fs::copy(sample_file().path(), &path).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn loading_one_path_does_not_block_hits_on_another() {
        let a = sample_file();
        let cache = DatasetCache::new();
        cache.get_or_load(a.path()).unwrap();

        // While the slot for `b` is mid-initialisation, a hit on `a` must
        // still go through instead of waiting on the map lock.
        let b = Path::new("/slow/b.csv");
        let slot = cache.slot(b);
        let during = slot.get_or_init(|| cache.get_or_load(a.path()).unwrap());
        assert_eq!(during.len(), 1);
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn distinct_paths_load_separately() {
        let a = sample_file();
        let b = sample_file();
        let cache = DatasetCache::new();
        cache.get_or_load(a.path()).unwrap();
        cache.get_or_load(b.path()).unwrap();
        cache.get_or_load(a.path()).unwrap();
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn concurrent_readers_share_one_load() {
        let tmp = sample_file();
        let cache = DatasetCache::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| cache.get_or_load(tmp.path()).unwrap());
            }
        });
        assert_eq!(cache.load_count(), 1);
    }
}
