//! Holder spawner trait definition.

use async_trait::async_trait;

use crate::domain::LevelBatch;
use crate::error::PinholdError;

/// Launches detached holder processes.
///
/// A holder drives every line of its batch for as long as it runs, so it
/// must be fully detached from the caller: own process group, no
/// inherited standard streams, and it must survive caller exit.
#[async_trait]
pub trait HolderSpawner: Send + Sync {
    /// Start exactly one detached holder for the whole batch.
    ///
    /// Fire-and-forget: the call never blocks on the holder's lifetime.
    /// Returns the pid when the backend learns it at spawn time; `None`
    /// when only pattern search can identify the process later.
    async fn spawn(&self, batch: &LevelBatch) -> Result<Option<u32>, PinholdError>;

    /// Live search for a holder matching the batch's full signature
    /// (every `pin=level` assignment present on its command line).
    async fn find_holder(&self, batch: &LevelBatch) -> Option<u32>;
}
