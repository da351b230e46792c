//! Core domain types and port definitions for pinhold.
//!
//! pinhold supervises external "holder" processes that keep GPIO output
//! lines driven at a commanded level. This crate holds the pure domain
//! model, the port traits the supervisor depends on, the error taxonomy
//! and path/settings plumbing. It contains no process or filesystem
//! implementation details; those live in `pinhold-runtime`.

pub mod domain;
pub mod error;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{Direction, Level, LevelBatch, LineGroupKey, PinNumber, PinSnapshot};
pub use error::PinholdError;
pub use paths::{PathError, data_root, markers_dir, shadow_path};
pub use ports::{
    HolderRegistry, HolderSpawner, LevelProbe, LineInfoProbe, ProcessControl, ShadowStore,
};
pub use settings::{DEFAULT_CHIP, Settings, SettingsError, validate_settings};
