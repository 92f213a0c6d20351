use super::connectors::CsvConnector;
use crate::error::Result;
use crate::types::Dataset;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: PathBuf,
    date_field: String,
}

/// In-memory dataset store keyed by `(source path, date field)`.
///
/// A key is populated at most once per process unless it is invalidated.
/// The lock is not held across a load; duplicate population is idempotent.
pub struct DatasetCache {
    data: Mutex<HashMap<CacheKey, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached dataset for the key, loading it on first use.
    pub fn get_or_load<P: AsRef<Path>>(&self, source: P, date_field: &str) -> Result<Arc<Dataset>> {
        let key = CacheKey {
            source: source.as_ref().to_path_buf(),
            date_field: date_field.to_string(),
        };

        if let Some(dataset) = self.data.lock().unwrap().get(&key) {
            debug!("Cache hit for {}", key.source.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(CsvConnector::load(&key.source, &key.date_field)?);
        self.data
            .lock()
            .unwrap()
            .insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop one entry. Returns true if the key was cached.
    pub fn invalidate<P: AsRef<Path>>(&self, source: P, date_field: &str) -> bool {
        let key = CacheKey {
            source: source.as_ref().to_path_buf(),
            date_field: date_field.to_string(),
        };
        self.data.lock().unwrap().remove(&key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.data.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().is_empty()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "\
Date,Open,High,Low,Close,Volume,name
2021-01-01,10,11,9,10.5,100,BTC
2021-01-02,10.5,12,10,11,120,BTC
";

    fn write_fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, CSV).unwrap();
        path
    }

    #[test]
    fn test_second_load_does_not_reread_source() {
        let path = write_fixture("cryptodash_cache_hit.csv");
        let cache = DatasetCache::new();

        let first = cache.get_or_load(&path, "Date").unwrap();
        assert_eq!(first.len(), 2);

        // With the file gone, only the cache can satisfy this.
        fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&path, "Date").unwrap();
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let path = write_fixture("cryptodash_cache_invalidate.csv");
        let cache = DatasetCache::new();

        cache.get_or_load(&path, "Date").unwrap();
        assert!(cache.invalidate(&path, "Date"));
        assert!(!cache.invalidate(&path, "Date"));

        fs::remove_file(&path).unwrap();
        assert!(cache.get_or_load(&path, "Date").is_err());
    }

    #[test]
    fn test_distinct_date_fields_are_distinct_keys() {
        let path = write_fixture("cryptodash_cache_keys.csv");
        let cache = DatasetCache::new();

        cache.get_or_load(&path, "Date").unwrap();
        assert_eq!(cache.len(), 1);

        // A different date field is a different key and triggers its own load.
        assert!(cache.get_or_load(&path, "Timestamp").is_err());
        assert_eq!(cache.len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_clear_empties_cache() {
        let path = write_fixture("cryptodash_cache_clear.csv");
        let cache = DatasetCache::new();

        cache.get_or_load(&path, "Date").unwrap();
        cache.clear();
        assert!(cache.is_empty());

        fs::remove_file(&path).unwrap();
    }
}
