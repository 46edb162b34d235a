use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{load_path, LoadError, LoadOptions};
use super::model::Table;

// ---------------------------------------------------------------------------
// Caller-owned table cache for fixed-path datasets
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CacheEntry {
    options: LoadOptions,
    modified: Option<SystemTime>,
    table: Arc<Table>,
}

/// Remembers tables loaded from disk so re-rendering does not re-read the file.
///
/// An entry is reused only while the path, the load options and the file's
/// modification time all match.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on a miss.
    ///
    /// A failed load leaves any existing entry untouched.
    pub fn load(&mut self, path: &Path, options: LoadOptions) -> Result<Arc<Table>, LoadError> {
        let key = cache_key(path);
        let modified = modified_time(path);

        if let Some(entry) = self.entries.get(&key) {
            if entry.options == options && modified.is_some() && entry.modified == modified {
                log::debug!("table cache hit: {}", key.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        log::debug!("table cache miss: {}", key.display());
        let table = Arc::new(load_path(path, options)?);
        self.entries.insert(
            key,
            CacheEntry {
                options,
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path`; the next `load` re-reads the file.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(&cache_key(path));
    }
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const CSV: &str = "Sales,Profit,Category,Region,Product Name,State\n10,1,A,East,P,Ohio\n";

    fn touch_later(path: &Path) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        let later = SystemTime::now() + Duration::from_secs(3600);
        file.set_modified(later).unwrap();
    }

    #[test]
    fn test_second_load_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path, LoadOptions::default()).unwrap();
        let second = cache.load(&path, LoadOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path, LoadOptions::default()).unwrap();

        std::fs::write(&path, format!("{CSV}20,2,B,West,Q,Utah\n")).unwrap();
        touch_later(&path);

        let second = cache.load(&path, LoadOptions::default()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_different_options_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        cache.load(&path, LoadOptions::default()).unwrap();
        let strict = LoadOptions {
            require_order_date: true,
        };
        assert!(matches!(
            cache.load(&path, strict),
            Err(LoadError::MissingColumn("Order Date"))
        ));
        // the earlier entry survives the failed load
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new();
        let first = cache.load(&path, LoadOptions::default()).unwrap();
        cache.invalidate(&path);
        assert!(cache.entries.is_empty());
        let second = cache.load(&path, LoadOptions::default()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
