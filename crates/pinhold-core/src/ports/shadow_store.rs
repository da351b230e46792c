//! Shadow state store trait definition.

use async_trait::async_trait;

use crate::domain::{Level, PinNumber};
use crate::error::PinholdError;

/// Persisted pin -> last-commanded-level map.
///
/// The holder interface cannot be queried for commanded output state, so
/// this store is the supervisor's only memory of what it asked for.
/// Entries are created on first drive, overwritten unconditionally on
/// every subsequent one, and never deleted by drive or release.
#[async_trait]
pub trait ShadowStore: Send + Sync {
    /// Last commanded level for a pin, if one was ever recorded.
    async fn get_level(&self, pin: PinNumber) -> Result<Option<Level>, PinholdError>;

    /// Record the commanded level for a pin (unconditional overwrite).
    async fn set_level(&self, pin: PinNumber, level: Level) -> Result<(), PinholdError>;

    /// Record several commanded levels at once.
    async fn set_levels(&self, levels: &[(PinNumber, Level)]) -> Result<(), PinholdError>;

    /// Drop all entries. Test support only.
    async fn clear(&self) -> Result<(), PinholdError>;
}
