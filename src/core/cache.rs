// src/core/cache.rs

use crate::constants::{STAMP_CONTENT, STAMP_EXTENSION};
use log::debug;
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Component, Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Failures while recording a marker.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The marker's parent directory could not be created.
    #[error("Could not create cache directory '{path}': {source}")]
    DirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The marker could not be written or renamed into place.
    #[error("Could not write stamp '{path}': {source}")]
    StampWrite {
        /// The marker path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A filesystem-backed freshness oracle.
///
/// For every tracked file there is a marker under the cache root whose own
/// modification time records when the tracked file was last processed
/// successfully. The markers are the only state that survives between runs.
#[derive(Debug, Clone)]
pub struct StalenessCache {
    root: PathBuf,
}

impl StalenessCache {
    /// A cache whose markers live under `root`. Nothing is created until a
    /// marker is recorded.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding every marker.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The marker location for `tracked`: its path mirrored under the cache
    /// root with `.stamp` appended. Root and prefix components are dropped and
    /// `..` is mapped to `__parent__` so a marker never lands outside the root.
    pub fn marker_path(&self, tracked: &Path) -> PathBuf {
        let mut marker = self.root.clone();
        let mut last: Option<OsString> = None;
        for component in tracked.components() {
            let part = match component {
                Component::Normal(part) => part.to_os_string(),
                Component::ParentDir => OsString::from("__parent__"),
                Component::RootDir | Component::Prefix(_) | Component::CurDir => continue,
            };
            if let Some(previous) = last.replace(part) {
                marker.push(previous);
            }
        }
        let mut file_name = last.unwrap_or_else(|| OsString::from("_"));
        file_name.push(".");
        file_name.push(STAMP_EXTENSION);
        marker.push(file_name);
        marker
    }

    /// Returns `true` if `tracked` must be processed again.
    ///
    /// A missing marker is always stale. Otherwise the tracked file is stale
    /// only when it is strictly newer than its marker. If the tracked file's
    /// timestamp cannot be read the answer is `true`, so the guarded operation
    /// runs and reports the real problem.
    pub fn is_stale(&self, tracked: &Path) -> bool {
        let marker = self.marker_path(tracked);
        let marker_time = match fs::metadata(&marker).and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(_) => {
                debug!("No stamp for '{}', treating as stale", tracked.display());
                return true;
            }
        };

        match fs::metadata(tracked).and_then(|m| m.modified()) {
            Ok(tracked_time) => {
                let stale = tracked_time > marker_time;
                debug!(
                    "Stamp check for '{}': {}",
                    tracked.display(),
                    if stale { "stale" } else { "fresh" }
                );
                stale
            }
            Err(e) => {
                debug!(
                    "Could not read modification time of '{}' ({}), treating as stale",
                    tracked.display(),
                    e
                );
                true
            }
        }
    }

    /// Records `tracked` as freshly processed.
    ///
    /// Call only after the operation guarded by `is_stale` succeeded. The marker
    /// is written to a temporary sibling and renamed into place, so an
    /// interrupted write leaves either the old marker or none at all.
    pub fn record_fresh(&self, tracked: &Path) -> Result<(), CacheError> {
        let marker = self.marker_path(tracked);
        let parent = marker.parent().unwrap_or(self.root.as_path());

        fs::create_dir_all(parent).map_err(|e| CacheError::DirCreation {
            path: parent.display().to_string(),
            source: e,
        })?;

        let stamp_error = |source: std::io::Error| CacheError::StampWrite {
            path: marker.display().to_string(),
            source,
        };

        let mut temp = NamedTempFile::new_in(parent).map_err(stamp_error)?;
        temp.write_all(STAMP_CONTENT.as_bytes()).map_err(stamp_error)?;
        temp.persist(&marker).map_err(|e| stamp_error(e.error))?;

        debug!("Recorded stamp '{}'", marker.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch_later(path: &Path, seconds: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(seconds))
            .unwrap();
    }

    #[test]
    fn test_marker_path_mirrors_tracked_path() {
        let cache = StalenessCache::new("temp");
        assert_eq!(
            cache.marker_path(Path::new("ntt_server/requirements.txt")),
            Path::new("temp")
                .join("ntt_server")
                .join("requirements.txt.stamp")
        );
    }

    #[test]
    fn test_marker_path_stays_under_root() {
        let cache = StalenessCache::new("temp");
        let marker = cache.marker_path(Path::new("../outside/./requirements.txt"));
        assert_eq!(
            marker,
            Path::new("temp")
                .join("__parent__")
                .join("outside")
                .join("requirements.txt.stamp")
        );

        let absolute = std::env::temp_dir().join("svc").join("requirements.txt");
        assert!(cache.marker_path(&absolute).starts_with("temp"));
    }

    #[test]
    fn test_never_recorded_is_stale() {
        let dir = TempDir::new().unwrap();
        let tracked = dir.path().join("requirements.txt");
        fs::write(&tracked, "fastapi\n").unwrap();

        let cache = StalenessCache::new(dir.path().join("temp"));
        assert!(cache.is_stale(&tracked));
        // Asking does not create anything.
        assert!(!cache.root().exists());
    }

    #[test]
    fn test_record_fresh_then_modify() {
        let dir = TempDir::new().unwrap();
        let tracked = dir.path().join("svc").join("requirements.txt");
        fs::create_dir_all(tracked.parent().unwrap()).unwrap();
        fs::write(&tracked, "fastapi\n").unwrap();

        let cache = StalenessCache::new(dir.path().join("temp"));
        cache.record_fresh(&tracked).unwrap();
        assert!(!cache.is_stale(&tracked));

        fs::write(&tracked, "fastapi\nrequests\n").unwrap();
        touch_later(&tracked, 10);
        assert!(cache.is_stale(&tracked));

        // A new stamp written after the change would still be older than the
        // future mtime, so push the tracked file back and re-record.
        let file = fs::File::options().write(true).open(&tracked).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(10))
            .unwrap();
        cache.record_fresh(&tracked).unwrap();
        assert!(!cache.is_stale(&tracked));
    }

    #[test]
    fn test_record_fresh_creates_root_and_writes_placeholder() {
        let dir = TempDir::new().unwrap();
        let cache = StalenessCache::new(dir.path().join("temp"));
        let tracked = Path::new("ntt_server/requirements.txt");

        cache.record_fresh(tracked).unwrap();

        let marker = cache.marker_path(tracked);
        assert!(marker.starts_with(dir.path().join("temp")));
        assert_eq!(fs::read_to_string(&marker).unwrap(), "cached");
    }

    #[test]
    fn test_record_fresh_overwrites_existing_marker() {
        let dir = TempDir::new().unwrap();
        let cache = StalenessCache::new(dir.path().join("temp"));
        let tracked = Path::new("svc/requirements.txt");

        let marker = cache.marker_path(tracked);
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(&marker, "garbage from an older version").unwrap();

        cache.record_fresh(tracked).unwrap();
        assert_eq!(fs::read_to_string(&marker).unwrap(), "cached");
    }

    #[test]
    fn test_missing_tracked_file_is_stale() {
        let dir = TempDir::new().unwrap();
        let cache = StalenessCache::new(dir.path().join("temp"));
        let tracked = dir.path().join("gone.txt");

        cache.record_fresh(&tracked).unwrap();
        assert!(cache.is_stale(&tracked));
    }
}
