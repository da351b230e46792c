//! Pin service facade composing the reader and the supervisor.

use std::sync::Arc;

use pinhold_core::domain::{Direction, Level, LevelBatch, PinNumber, PinSnapshot};
use pinhold_core::error::PinholdError;
use pinhold_core::paths::{self, PathError};
use pinhold_core::settings::Settings;

use crate::probe::GpiodProbe;
use crate::reader::LineReader;
use crate::registry::{MarkerRegistry, SignalProcessControl};
use crate::shadow::FileShadowStore;
use crate::spawn::HolderToolSpawner;
use crate::supervisor::HolderSupervisor;

/// Facade answering "get pin snapshot" / "set pin level" / "set pin
/// direction" for single pins and ordered batches.
pub struct PinService {
    reader: LineReader,
    supervisor: HolderSupervisor,
}

impl PinService {
    pub fn new(reader: LineReader, supervisor: HolderSupervisor) -> Self {
        Self { reader, supervisor }
    }

    /// Wire the production components from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, PathError> {
        let data_dir = settings.data_dir.as_deref();
        let shadow = Arc::new(FileShadowStore::new(paths::shadow_path(data_dir)?));
        let control = Arc::new(SignalProcessControl::from_settings(settings));
        let registry = Arc::new(MarkerRegistry::new(
            paths::markers_dir(data_dir)?,
            control.clone(),
        ));
        let spawner = Arc::new(HolderToolSpawner::from_settings(settings));
        let probe = Arc::new(GpiodProbe::from_settings(settings));

        let supervisor = HolderSupervisor::new(
            shadow.clone(),
            registry,
            control,
            spawner,
            settings,
        );
        let reader = LineReader::new(shadow, probe.clone(), probe);
        Ok(Self::new(reader, supervisor))
    }

    /// Snapshot of a single pin.
    pub async fn get(&self, pin: PinNumber) -> Result<PinSnapshot, PinholdError> {
        self.reader.get(pin).await
    }

    /// Snapshots for an ordered pin sequence, duplicates preserved.
    ///
    /// Results are collected per pin; one pin's failure never suppresses
    /// the others.
    pub async fn get_all(&self, pins: &[PinNumber]) -> Vec<Result<PinSnapshot, PinholdError>> {
        let mut results = Vec::with_capacity(pins.len());
        for pin in pins {
            results.push(self.reader.get(*pin).await);
        }
        results
    }

    /// Drive a single pin at a level.
    pub async fn set_level(&self, pin: PinNumber, level: Level) -> Result<(), PinholdError> {
        self.supervisor.drive_one(pin, level).await
    }

    /// Drive an ordered batch of pins with one holder.
    pub async fn set_levels(&self, batch: &LevelBatch) -> Result<(), PinholdError> {
        self.supervisor.drive_many(batch).await
    }

    /// Set a pin's direction.
    ///
    /// Output re-drives the last commanded level when one is cached, low
    /// otherwise; input releases the pin (the shadow entry stays, it is
    /// simply irrelevant for an input line).
    pub async fn set_direction(
        &self,
        pin: PinNumber,
        direction: Direction,
    ) -> Result<(), PinholdError> {
        match direction {
            Direction::Output => {
                let level = self.reader.shadow_level(pin).await?.unwrap_or(Level::Low);
                self.supervisor.drive_one(pin, level).await
            }
            Direction::Input => self.supervisor.release(pin).await,
        }
    }

    /// Set directions for an ordered pin sequence.
    ///
    /// Applies the same level rule as [`Self::set_direction`] per pin;
    /// all output-bound pins are driven together as one batch, after the
    /// input-bound ones are released.
    pub async fn set_directions(
        &self,
        directions: &[(PinNumber, Direction)],
    ) -> Result<(), PinholdError> {
        let mut outputs: Vec<(PinNumber, Level)> = Vec::new();
        for (pin, direction) in directions {
            match direction {
                Direction::Output => {
                    let level = self.reader.shadow_level(*pin).await?.unwrap_or(Level::Low);
                    outputs.push((*pin, level));
                }
                Direction::Input => self.supervisor.release(*pin).await?,
            }
        }
        if !outputs.is_empty() {
            let batch = LevelBatch::new(outputs)?;
            self.supervisor.drive_many(&batch).await?;
        }
        Ok(())
    }
}
