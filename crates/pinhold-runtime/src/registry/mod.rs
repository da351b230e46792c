//! Holder bookkeeping and process control.
//!
//! Marker files record which pid holds which line group; signals and
//! process-listing pattern search keep that bookkeeping honest.
//!
//! # Safety guarantees
//! - Atomic marker writes via temp file + rename
//! - Liveness verification before trusting a marker (stale pids are
//!   silently discarded)
//! - Graceful-stop first, forceful kill only after a bounded wait

mod markers;
mod process;

pub use markers::MarkerRegistry;
pub use process::SignalProcessControl;
