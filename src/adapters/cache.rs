use crate::domain::model::CacheEntry;
use crate::domain::ports::ResultCache;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

/// File-backed result cache: one JSON file per (product_type, budget)
/// key under a base directory. Whole-file writes keep per-key updates
/// atomic enough for single-process use.
#[derive(Debug, Clone)]
pub struct FileCache {
    base_path: PathBuf,
}

impl FileCache {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn entry_path(&self, product_type: &str, budget: u32) -> PathBuf {
        let key: String = product_type
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        self.base_path.join(format!("{}_{}.json", key, budget))
    }
}

#[async_trait]
impl ResultCache for FileCache {
    async fn get(&self, product_type: &str, budget: u32) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(product_type, budget);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ScoutError::CacheError {
                    reason: format!("failed to read {}: {}", path.display(), e),
                })
            }
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| ScoutError::CacheError {
                reason: format!("corrupt cache entry {}: {}", path.display(), e),
            })
    }

    async fn put(&self, product_type: &str, budget: u32, entry: &CacheEntry) -> Result<()> {
        if let Err(e) = fs::create_dir_all(&self.base_path) {
            return Err(ScoutError::CacheError {
                reason: format!(
                    "failed to create cache dir {}: {}",
                    self.base_path.display(),
                    e
                ),
            });
        }

        let path = self.entry_path(product_type, budget);
        let data = serde_json::to_vec_pretty(entry).map_err(|e| ScoutError::CacheError {
            reason: format!("failed to encode cache entry: {}", e),
        })?;

        // Write-then-rename so a concurrent reader never sees a partial
        // entry.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(|e| ScoutError::CacheError {
            reason: format!("failed to write {}: {}", tmp_path.display(), e),
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| ScoutError::CacheError {
            reason: format!("failed to move {} into place: {}", tmp_path.display(), e),
        })
    }
}
