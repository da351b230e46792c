//! Read-only probe trait definitions.

use async_trait::async_trait;

use crate::domain::{Direction, PinNumber};

/// Answers whether a line is currently configured as input or output.
///
/// Infallible by design: a probe that cannot run, finds no record for the
/// pin, or returns ambiguous text reports `Input`. Failing toward input
/// is the safe default; a line must never be claimed drivable output when
/// uncertain.
#[async_trait]
pub trait LineInfoProbe: Send + Sync {
    async fn direction(&self, pin: PinNumber) -> Direction;
}

/// Reads an input line's level as raw tool output.
///
/// Returns `None` when the tool could not run or produced nothing usable;
/// the decoder treats that as an unconfigured line reading low. Decoding
/// the text into a typed level is deliberately not part of this port, so
/// the grammar stays independently testable.
#[async_trait]
pub trait LevelProbe: Send + Sync {
    async fn read_raw(&self, pin: PinNumber) -> Option<String>;
}
