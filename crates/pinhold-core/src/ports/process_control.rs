//! Process control trait definition.

use async_trait::async_trait;

use crate::domain::PinNumber;
use crate::error::PinholdError;

/// Signal-level control over holder processes.
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Non-destructive liveness probe.
    async fn is_alive(&self, pid: u32) -> bool;

    /// Liveness probe plus command-line verification.
    ///
    /// True only when `pid` is alive and actually running a holder
    /// invocation. Registries must use this before trusting (or
    /// terminating) a recorded pid: the OS may have reused it for an
    /// unrelated process.
    async fn is_holder(&self, pid: u32) -> bool;

    /// Stop a process: graceful signal, bounded wait, forceful kill.
    ///
    /// Idempotent; returns `Ok` when the process is gone or never
    /// existed, regardless of who killed it.
    async fn terminate(&self, pid: u32) -> Result<(), PinholdError>;

    /// Live process-listing search for a holder driving `pin`.
    ///
    /// Fallback discovery for pins that appear held but have no registry
    /// entry (self-healing after lost bookkeeping).
    async fn find_by_pin(&self, pin: PinNumber) -> Option<u32>;
}
