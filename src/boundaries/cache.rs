//! File cache for downloaded boundary datasets.
//!
//! One pretty-printed GeoJSON file per (iso3, level, release) key. No expiry
//! and no versioning; the file name alone carries the provenance.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use geojson::FeatureCollection;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::boundaries::FetchError;
use crate::models::BoundaryRequest;

/// Cache directory holding one `.geojson` file per request key.
#[derive(Debug, Clone)]
pub struct BoundaryCache {
    dir: PathBuf,
}

impl BoundaryCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FetchError::CacheIo {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic cache path for a request.
    pub fn path_for(&self, request: &BoundaryRequest) -> PathBuf {
        self.dir.join(request.cache_file_name())
    }

    /// Load the cached entry for `request`, if one exists.
    ///
    /// A file that fails to parse is deleted before returning the error, so
    /// the next call for the same key goes to the network. This call does
    /// not re-fetch.
    pub fn load(&self, request: &BoundaryRequest) -> Result<Option<FeatureCollection>, FetchError> {
        let path = self.path_for(request);
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path).map_err(|source| FetchError::CacheIo {
            path: path.clone(),
            source,
        })?;

        match serde_json::from_str::<FeatureCollection>(&text) {
            Ok(collection) => {
                info!("Loaded boundaries from cache: {}", path.display());
                Ok(Some(collection))
            }
            Err(source) => {
                warn!(
                    "Cache file {} is corrupt, removing it: {}",
                    path.display(),
                    source
                );
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove corrupt cache file {}: {}", path.display(), e);
                }
                Err(FetchError::CorruptCache { path, source })
            }
        }
    }

    /// Persist a downloaded collection for `request`.
    ///
    /// Written to a temp file in the cache directory and renamed into place,
    /// so readers never observe a partially written entry. Pretty-printed
    /// for human inspection.
    pub fn store(
        &self,
        request: &BoundaryRequest,
        collection: &FeatureCollection,
    ) -> Result<PathBuf, FetchError> {
        let path = self.path_for(request);
        let io_err = |source| FetchError::CacheIo {
            path: path.clone(),
            source,
        };

        let text = serde_json::to_string_pretty(collection)
            .map_err(|e| io_err(std::io::Error::other(e)))?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        info!("Boundaries saved to cache: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseType;

    fn sample_collection() -> FeatureCollection {
        serde_json::from_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": null, "properties": {"shapeName": "Bolivia"}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BoundaryCache::open(dir.path()).unwrap();
        let request = BoundaryRequest::new("BOL", 0, ReleaseType::GbOpen);

        let stored_path = cache.store(&request, &sample_collection()).unwrap();
        assert_eq!(
            stored_path.file_name().unwrap().to_str().unwrap(),
            "BOL_ADM0_gbOpen.geojson"
        );

        let loaded = cache.load(&request).unwrap().unwrap();
        assert_eq!(loaded.features.len(), 1);
    }

    #[test]
    fn test_missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BoundaryCache::open(dir.path()).unwrap();
        let request = BoundaryRequest::new("YEM", 1, ReleaseType::GbOpen);
        assert!(cache.load(&request).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_deleted_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BoundaryCache::open(dir.path()).unwrap();
        let request = BoundaryRequest::new("BOL", 0, ReleaseType::GbOpen);

        let path = cache.path_for(&request);
        fs::write(&path, "{ not json").unwrap();

        let err = cache.load(&request).unwrap_err();
        assert!(matches!(err, FetchError::CorruptCache { .. }));
        assert!(!path.exists(), "corrupt file should have been removed");
    }

    #[test]
    fn test_stored_entry_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BoundaryCache::open(dir.path()).unwrap();
        let request = BoundaryRequest::new("BOL", 0, ReleaseType::GbOpen);

        let path = cache.store(&request, &sample_collection()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains('\n'), "expected indented output");
    }
}
