//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the supervision core expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No filesystem or process implementation details in any signature
//! - The supervisor never shells out directly, always through a port
//! - Intent-based methods (terminate a holder, not "send SIGTERM")

pub mod holder_registry;
pub mod holder_spawner;
pub mod line_probe;
pub mod process_control;
pub mod shadow_store;

pub use holder_registry::HolderRegistry;
pub use holder_spawner::HolderSpawner;
pub use line_probe::{LevelProbe, LineInfoProbe};
pub use process_control::ProcessControl;
pub use shadow_store::ShadowStore;
