//! Level and direction resolution for single pins.

use std::sync::Arc;

use tracing::debug;

use pinhold_core::domain::{Direction, Level, PinNumber, PinSnapshot};
use pinhold_core::error::PinholdError;
use pinhold_core::ports::{LevelProbe, LineInfoProbe, ShadowStore};

use crate::probe::decode_level;

/// Resolves a pin's current level and direction.
///
/// Outputs (and any pin with a shadow entry) answer from the shadow
/// store; inputs without one go through a live probe read and the level
/// decoder.
pub struct LineReader {
    shadow: Arc<dyn ShadowStore>,
    info: Arc<dyn LineInfoProbe>,
    level: Arc<dyn LevelProbe>,
}

impl LineReader {
    pub fn new(
        shadow: Arc<dyn ShadowStore>,
        info: Arc<dyn LineInfoProbe>,
        level: Arc<dyn LevelProbe>,
    ) -> Self {
        Self {
            shadow,
            info,
            level,
        }
    }

    /// Last commanded level for a pin, if one was ever recorded.
    pub async fn shadow_level(&self, pin: PinNumber) -> Result<Option<Level>, PinholdError> {
        self.shadow.get_level(pin).await
    }

    /// Snapshot of a pin: direction plus resolved level.
    pub async fn get(&self, pin: PinNumber) -> Result<PinSnapshot, PinholdError> {
        let direction = self.info.direction(pin).await;
        let level = self.level_for(pin, direction).await?;
        Ok(PinSnapshot::new(pin, direction, level))
    }

    /// Resolve a pin's level given an already-probed direction.
    ///
    /// A shadow entry wins outright. An output with none defaults to low
    /// rather than failing the caller (a pin newly discovered as output
    /// has no recorded command). An input with none is probed live; an
    /// unavailable probe reads low, unrecognized text is a decode error.
    pub async fn level_for(
        &self,
        pin: PinNumber,
        direction: Direction,
    ) -> Result<Level, PinholdError> {
        if let Some(level) = self.shadow.get_level(pin).await? {
            return Ok(level);
        }
        match direction {
            Direction::Output => Ok(Level::Low),
            Direction::Input => match self.level.read_raw(pin).await {
                Some(raw) => decode_level(pin, &raw),
                None => {
                    debug!(pin = %pin, "Level probe unavailable, reading low");
                    Ok(Level::Low)
                }
            },
        }
    }

    /// Resolve a pin's level, probing the direction as needed.
    pub async fn current_level(&self, pin: PinNumber) -> Result<Level, PinholdError> {
        if let Some(level) = self.shadow.get_level(pin).await? {
            return Ok(level);
        }
        let direction = self.info.direction(pin).await;
        self.level_for(pin, direction).await
    }
}
