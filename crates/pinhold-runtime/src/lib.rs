//! Process supervision and OS-level concerns for pinhold.
//!
//! This crate implements the ports defined in `pinhold-core` against the
//! real world: marker files for holder bookkeeping, unix signals for
//! process control, `sysinfo` pattern search for self-healing discovery,
//! and the libgpiod command-line tools for probing and holding lines.

pub mod probe;
pub mod reader;
pub mod registry;
pub mod service;
pub mod shadow;
pub mod spawn;
pub mod supervisor;

pub use probe::{GpiodProbe, decode_level, parse_direction};
pub use reader::LineReader;
pub use registry::{MarkerRegistry, SignalProcessControl};
pub use service::PinService;
pub use shadow::FileShadowStore;
pub use spawn::HolderToolSpawner;
pub use supervisor::HolderSupervisor;
