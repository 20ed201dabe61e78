use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpecError};
use crate::options::TranspileOptions;
use crate::transpile::Transpiled;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub output: Transpiled,
}

/// Transpiled output keyed by spec path, invalidated by a hash of the source
/// text and the transform configuration.
pub struct IncrementalCache {
    cache_dir: PathBuf,
    options_fingerprint: String,
}

impl IncrementalCache {
    pub fn new(cache_dir: impl Into<PathBuf>, options: &TranspileOptions) -> Self {
        let cache_dir = cache_dir.into();
        if !cache_dir.exists() {
            if let Err(e) = fs::create_dir_all(&cache_dir) {
                tracing::warn!("Cache directory {} unavailable: {}", cache_dir.display(), e);
            }
        }
        // TranspileOptions holds only plain enums; serialization cannot fail.
        let options_fingerprint = serde_json::to_string(options).unwrap_or_default();
        Self {
            cache_dir,
            options_fingerprint,
        }
    }

    pub fn compute_hash(&self, source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.options_fingerprint.as_bytes());
        hasher.update([0u8]);
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, spec_path: &Path) -> PathBuf {
        let safe_name = spec_path
            .to_string_lossy()
            .replace('/', "_")
            .replace('\\', "_")
            .replace(':', "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    pub fn get(&self, spec_path: &Path, source: &str) -> Option<Transpiled> {
        let cache_path = self.get_cache_path(spec_path);
        if !cache_path.exists() {
            return None;
        }

        let data = fs::read_to_string(&cache_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    "Cache entry for {} is corrupt, discarding: {}",
                    spec_path.display(),
                    e
                );
                fs::remove_file(&cache_path).ok();
                return None;
            }
        };

        if entry.hash == self.compute_hash(source) {
            Some(entry.output)
        } else {
            None
        }
    }

    pub fn set(&self, spec_path: &Path, source: &str, output: &Transpiled) -> Result<()> {
        let cache_path = self.get_cache_path(spec_path);
        let entry = CacheEntry {
            hash: self.compute_hash(source),
            output: output.clone(),
        };

        let data = serde_json::to_string(&entry).map_err(|source| SpecError::Cache {
            path: cache_path.clone(),
            source,
        })?;
        fs::write(&cache_path, data).map_err(|source| SpecError::Write {
            path: cache_path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Transpiled {
        Transpiled {
            code: "const userName = 1;\n".to_string(),
            renamed: vec![],
        }
    }

    #[test]
    fn test_hit_after_set() {
        let dir = TempDir::new().unwrap();
        let cache = IncrementalCache::new(dir.path(), &TranspileOptions::default());
        let spec = Path::new("specs/a.ts");

        assert!(cache.get(spec, "const user_name = 1;").is_none());
        cache.set(spec, "const user_name = 1;", &sample()).unwrap();
        assert_eq!(cache.get(spec, "const user_name = 1;"), Some(sample()));
    }

    #[test]
    fn test_source_change_misses() {
        let dir = TempDir::new().unwrap();
        let cache = IncrementalCache::new(dir.path(), &TranspileOptions::default());
        let spec = Path::new("specs/a.ts");

        cache.set(spec, "const user_name = 1;", &sample()).unwrap();
        assert!(cache.get(spec, "const user_name = 2;").is_none());
    }

    #[test]
    fn test_options_are_part_of_the_key() {
        let dir = TempDir::new().unwrap();
        let spec = Path::new("specs/a.ts");
        IncrementalCache::new(dir.path(), &TranspileOptions::default())
            .set(spec, "x", &sample())
            .unwrap();

        let plain = IncrementalCache::new(dir.path(), &TranspileOptions::without_passes());
        assert!(plain.get(spec, "x").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_discarded() {
        let dir = TempDir::new().unwrap();
        let cache = IncrementalCache::new(dir.path(), &TranspileOptions::default());
        let spec = Path::new("specs/a.ts");
        let path = cache.get_cache_path(spec);
        fs::write(&path, "{not json").unwrap();

        assert!(cache.get(spec, "x").is_none());
        assert!(!path.exists());
    }
}
