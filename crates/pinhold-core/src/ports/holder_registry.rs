//! Holder registry trait definition.

use async_trait::async_trait;

use crate::domain::{LineGroupKey, PinNumber};
use crate::error::PinholdError;

/// Durable map from line-group key to the pid of the holder driving it.
///
/// Registry state is advisory bookkeeping, not ground truth: any entry
/// whose pid is no longer a live process is stale and must be silently
/// discarded by implementations rather than reported. A crash between
/// spawn and record can leave a live holder with no entry here; the
/// supervisor covers that gap with pattern search.
#[async_trait]
pub trait HolderRegistry: Send + Sync {
    /// Pid recorded for the exact group key, if present and still live.
    async fn lookup(&self, key: &LineGroupKey) -> Result<Option<u32>, PinholdError>;

    /// Record a holder pid under a group key (last write wins).
    async fn record(&self, key: &LineGroupKey, pid: u32) -> Result<(), PinholdError>;

    /// Remove the entry for a group key. Idempotent.
    async fn remove(&self, key: &LineGroupKey) -> Result<(), PinholdError>;

    /// All live entries whose group shares at least one pin with `pins`.
    ///
    /// Stale entries encountered during the scan are discarded.
    async fn groups_overlapping(
        &self,
        pins: &[PinNumber],
    ) -> Result<Vec<(LineGroupKey, u32)>, PinholdError>;
}
