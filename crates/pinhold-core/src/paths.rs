//! Path resolution for pinhold's on-disk state.
//!
//! Data root: `~/.pinhold/` (or `PINHOLD_DATA_DIR`, or an explicit
//! override from settings). Registry markers live under `markers/`,
//! the shadow level cache at `shadow.json`.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,
}

/// Resolve the pinhold data root.
///
/// Precedence: the explicit override, then the `PINHOLD_DATA_DIR`
/// environment variable, then `~/.pinhold`.
pub fn data_root(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = env::var("PINHOLD_DATA_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".pinhold"))
        .ok_or(PathError::NoHomeDir)
}

/// Directory holding one marker file per live holder group.
pub fn markers_dir(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
    Ok(data_root(override_dir)?.join("markers"))
}

/// File holding the persisted pin -> last-commanded-level map.
pub fn shadow_path(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
    Ok(data_root(override_dir)?.join("shadow.json"))
}
