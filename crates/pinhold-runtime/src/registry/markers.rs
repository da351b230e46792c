//! Marker-file holder registry.
//!
//! One file per line group under the markers directory, named by the
//! canonical group key (`5-6.pid`), containing the holder's pid on the
//! first line. Written atomically via temp file + rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use pinhold_core::domain::{LineGroupKey, PinNumber};
use pinhold_core::error::PinholdError;
use pinhold_core::ports::{HolderRegistry, ProcessControl};

/// Registry backed by one marker file per group key.
pub struct MarkerRegistry {
    dir: PathBuf,
    control: Arc<dyn ProcessControl>,
}

impl MarkerRegistry {
    #[must_use]
    pub fn new(dir: PathBuf, control: Arc<dyn ProcessControl>) -> Self {
        Self { dir, control }
    }

    fn marker_path(&self, key: &LineGroupKey) -> PathBuf {
        self.dir.join(format!("{key}.pid"))
    }

    fn read_marker(path: &Path) -> Option<u32> {
        let content = fs::read_to_string(path).ok()?;
        content.lines().next()?.trim().parse::<u32>().ok()
    }

    fn delete_marker(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to delete stale marker");
            }
        }
    }

    /// Scan the markers directory, yielding `(key, pid, path)` for every
    /// well-formed marker. Foreign files and unparsable content are
    /// silently skipped.
    fn scan(&self) -> Result<Vec<(LineGroupKey, u32, PathBuf)>, PinholdError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PinholdError::Registry(e.to_string())),
        };

        let mut results = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PinholdError::Registry(e.to_string()))?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("pid") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(key) = LineGroupKey::from_stem(stem) else {
                continue;
            };
            if let Some(pid) = Self::read_marker(&path) {
                results.push((key, pid, path));
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl HolderRegistry for MarkerRegistry {
    async fn lookup(&self, key: &LineGroupKey) -> Result<Option<u32>, PinholdError> {
        let path = self.marker_path(key);
        let Some(pid) = Self::read_marker(&path) else {
            return Ok(None);
        };
        // Verify the command line, not just liveness: a reused pid may
        // belong to an unrelated process that must not be touched.
        if self.control.is_holder(pid).await {
            Ok(Some(pid))
        } else {
            debug!(key = %key, pid = %pid, "Discarding stale marker");
            Self::delete_marker(&path);
            Ok(None)
        }
    }

    async fn record(&self, key: &LineGroupKey, pid: u32) -> Result<(), PinholdError> {
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let final_path = self.marker_path(key);
            let temp_path = self.dir.join(format!("{key}.pid.tmp"));
            fs::write(&temp_path, format!("{pid}\n"))?;
            // Atomic replace; last write wins for racing callers
            fs::rename(&temp_path, &final_path)
        };
        write().map_err(|e| PinholdError::Registry(e.to_string()))
    }

    async fn remove(&self, key: &LineGroupKey) -> Result<(), PinholdError> {
        match fs::remove_file(self.marker_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PinholdError::Registry(e.to_string())),
        }
    }

    async fn groups_overlapping(
        &self,
        pins: &[PinNumber],
    ) -> Result<Vec<(LineGroupKey, u32)>, PinholdError> {
        let mut live = Vec::new();
        for (key, pid, path) in self.scan()? {
            if !self.control.is_holder(pid).await {
                debug!(key = %key, pid = %pid, "Discarding stale marker during scan");
                Self::delete_marker(&path);
                continue;
            }
            if key.overlaps_pins(pins) {
                live.push((key, pid));
            }
        }
        Ok(live)
    }
}
