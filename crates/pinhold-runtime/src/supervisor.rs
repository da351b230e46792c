//! Holder supervision: the drive/release state machine.
//!
//! Per pin the conceptual states are undriven -> held-by-a-group ->
//! undriven. Driving tears down every holder overlapping the target pins
//! (registry hits first, pattern search for the rest), spawns exactly one
//! new holder for the whole batch, records the commanded levels in the
//! shadow store, and opportunistically learns the new holder's pid.
//!
//! The discover -> kill -> spawn -> record sequence is not atomic; a
//! crash in between can leave a live holder with no registry entry. That
//! degraded state self-heals the next time an overlapping drive or
//! release runs pattern search.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use pinhold_core::domain::{Level, LevelBatch, PinNumber};
use pinhold_core::error::PinholdError;
use pinhold_core::ports::{HolderRegistry, HolderSpawner, ProcessControl, ShadowStore};
use pinhold_core::settings::Settings;

/// Orchestrates holder processes so no pin is ever driven twice.
pub struct HolderSupervisor {
    shadow: Arc<dyn ShadowStore>,
    registry: Arc<dyn HolderRegistry>,
    control: Arc<dyn ProcessControl>,
    spawner: Arc<dyn HolderSpawner>,
    discovery_polls: u32,
    discovery_poll_ms: u64,
}

impl HolderSupervisor {
    pub fn new(
        shadow: Arc<dyn ShadowStore>,
        registry: Arc<dyn HolderRegistry>,
        control: Arc<dyn ProcessControl>,
        spawner: Arc<dyn HolderSpawner>,
        settings: &Settings,
    ) -> Self {
        Self {
            shadow,
            registry,
            control,
            spawner,
            discovery_polls: settings.discovery_polls.unwrap_or(10),
            discovery_poll_ms: settings.discovery_poll_ms.unwrap_or(30),
        }
    }

    /// Drive every pin of the batch with a single new holder.
    ///
    /// The shadow entries are authoritative the instant this call
    /// accepts the request: they are written before the spawn and
    /// independent of its outcome. Spawn and record failures degrade to
    /// warnings; pattern search covers them on the next overlapping
    /// operation.
    pub async fn drive_many(&self, batch: &LevelBatch) -> Result<(), PinholdError> {
        let target = batch.pins();
        let key = batch.group_key();
        info!(key = %key, "Driving line group");

        self.teardown_overlapping(&target).await?;

        self.shadow.set_levels(batch.entries()).await?;

        // No holder was started on a spawn error, so there is nothing
        // to discover or record.
        match self.spawner.spawn(batch).await {
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to spawn holder, continuing");
            }
            Ok(spawned_pid) => match self.discover_pid(batch, spawned_pid).await {
                Some(pid) => {
                    if let Err(e) = self.registry.record(&key, pid).await {
                        warn!(key = %key, pid = %pid, error = %e, "Failed to record holder");
                    }
                }
                None => {
                    debug!(key = %key, "Holder pid not discovered; pattern search will cover it");
                }
            },
        }
        Ok(())
    }

    /// Drive a single pin (singleton batch).
    pub async fn drive_one(&self, pin: PinNumber, level: Level) -> Result<(), PinholdError> {
        self.drive_many(&LevelBatch::single(pin, level)).await
    }

    /// Release a pin: tear down any holder overlapping it, spawn nothing.
    ///
    /// Idempotent, and leaves the shadow entry in place (it becomes
    /// irrelevant once the line is input).
    pub async fn release(&self, pin: PinNumber) -> Result<(), PinholdError> {
        info!(pin = %pin, "Releasing line");
        self.teardown_overlapping(&[pin]).await
    }

    /// Terminate every holder whose group shares a pin with `target` and
    /// drop its registry entry, then pattern-search for unregistered
    /// holders on the still-uncovered pins.
    ///
    /// Entries are removed before any successor is recorded, so a stale
    /// entry never coexists with its successor's for a shared pin.
    async fn teardown_overlapping(&self, target: &[PinNumber]) -> Result<(), PinholdError> {
        let mut covered: HashSet<PinNumber> = HashSet::new();

        for (key, pid) in self.registry.groups_overlapping(target).await? {
            debug!(key = %key, pid = %pid, "Tearing down overlapping holder");
            if let Err(e) = self.control.terminate(pid).await {
                warn!(key = %key, pid = %pid, error = %e, "Failed to confirm holder exit");
            }
            self.registry.remove(&key).await?;
            covered.extend(key.pins().iter().copied());
        }

        // Self-healing: pins that look unheld on paper may still be held
        // by a holder whose bookkeeping was lost.
        for pin in target {
            if covered.contains(pin) {
                continue;
            }
            if let Some(pid) = self.control.find_by_pin(*pin).await {
                debug!(pin = %pin, pid = %pid, "Tearing down unregistered holder");
                if let Err(e) = self.control.terminate(pid).await {
                    warn!(pin = %pin, pid = %pid, error = %e, "Failed to confirm holder exit");
                }
            }
        }
        Ok(())
    }

    /// Best-effort, bounded-retry identification of the spawned holder.
    async fn discover_pid(&self, batch: &LevelBatch, spawned: Option<u32>) -> Option<u32> {
        if spawned.is_some() {
            return spawned;
        }
        for _ in 0..self.discovery_polls {
            sleep(Duration::from_millis(self.discovery_poll_ms)).await;
            if let Some(pid) = self.spawner.find_holder(batch).await {
                return Some(pid);
            }
        }
        None
    }
}
