//! File-backed shadow level cache.
//!
//! A single JSON object mapping pin number to level, rewritten atomically
//! (temp file + rename) on every update. A missing file reads as an empty
//! map. Entries are only ever added or overwritten; release does not
//! touch them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use pinhold_core::domain::{Level, PinNumber};
use pinhold_core::error::PinholdError;
use pinhold_core::ports::ShadowStore;

/// Shadow store persisted at a single JSON file.
pub struct FileShadowStore {
    path: PathBuf,
}

impl FileShadowStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<BTreeMap<PinNumber, Level>, PinholdError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(PinholdError::Shadow(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| PinholdError::Shadow(e.to_string()))
    }

    fn store(&self, map: &BTreeMap<PinNumber, Level>) -> Result<(), PinholdError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string(map).map_err(io::Error::other)?;
            let temp_path = self.path.with_extension("json.tmp");
            fs::write(&temp_path, content)?;
            // Atomic replace
            fs::rename(&temp_path, &self.path)
        };
        write().map_err(|e| PinholdError::Shadow(e.to_string()))
    }
}

#[async_trait]
impl ShadowStore for FileShadowStore {
    async fn get_level(&self, pin: PinNumber) -> Result<Option<Level>, PinholdError> {
        Ok(self.load()?.get(&pin).copied())
    }

    async fn set_level(&self, pin: PinNumber, level: Level) -> Result<(), PinholdError> {
        self.set_levels(&[(pin, level)]).await
    }

    async fn set_levels(&self, levels: &[(PinNumber, Level)]) -> Result<(), PinholdError> {
        let mut map = self.load()?;
        for (pin, level) in levels {
            map.insert(*pin, *level);
        }
        self.store(&map)
    }

    async fn clear(&self) -> Result<(), PinholdError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PinholdError::Shadow(e.to_string())),
        }
    }
}
