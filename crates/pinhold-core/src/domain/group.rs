//! Line groups and drive batches.
//!
//! A holder process drives one or more lines together. The canonical
//! identity of that set is the [`LineGroupKey`]; the ordered request that
//! produced it is the [`LevelBatch`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pin::{Level, PinNumber};
use crate::error::PinholdError;

/// Canonical (sorted, deduplicated) set of pins driven by one holder.
///
/// Renders to a stable marker-file stem (`"5-6-9"`) and parses back from
/// one, so the on-disk registry can be scanned without sidecar metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineGroupKey(Vec<PinNumber>);

impl LineGroupKey {
    /// Build a key from any collection of pins. Order and duplicates in
    /// the input do not affect the result.
    pub fn new(pins: impl IntoIterator<Item = PinNumber>) -> Self {
        let mut pins: Vec<PinNumber> = pins.into_iter().collect();
        pins.sort_unstable();
        pins.dedup();
        Self(pins)
    }

    /// Key for a single pin.
    #[must_use]
    pub fn single(pin: PinNumber) -> Self {
        Self(vec![pin])
    }

    /// Pins in canonical (ascending) order.
    #[must_use]
    pub fn pins(&self) -> &[PinNumber] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, pin: PinNumber) -> bool {
        self.0.binary_search(&pin).is_ok()
    }

    /// True when the two groups share at least one pin.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.0.iter().any(|p| other.contains(*p))
    }

    /// True when the group shares at least one pin with `pins`.
    #[must_use]
    pub fn overlaps_pins(&self, pins: &[PinNumber]) -> bool {
        pins.iter().any(|p| self.contains(*p))
    }

    /// Parse a key back from a marker-file stem (`"5-6-9"`).
    ///
    /// Returns `None` for empty or non-numeric stems; callers treat such
    /// files as foreign and skip them.
    #[must_use]
    pub fn from_stem(stem: &str) -> Option<Self> {
        let pins: Option<Vec<PinNumber>> =
            stem.split('-').map(|part| part.parse::<PinNumber>().ok()).collect();
        let pins = pins?;
        if pins.is_empty() {
            return None;
        }
        Some(Self::new(pins))
    }
}

impl fmt::Display for LineGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pin in &self.0 {
            if !first {
                f.write_str("-")?;
            }
            write!(f, "{pin}")?;
            first = false;
        }
        Ok(())
    }
}

/// Non-empty ordered mapping pin -> level for one drive request.
///
/// Insertion order is preserved because it determines the holder's
/// argument order; a later entry for a pin already present overwrites the
/// level in place rather than appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelBatch {
    entries: Vec<(PinNumber, Level)>,
}

impl LevelBatch {
    /// Build a batch from ordered (pin, level) pairs.
    ///
    /// # Errors
    ///
    /// Returns [`PinholdError::EmptyBatch`] when no pairs are given.
    pub fn new(pairs: impl IntoIterator<Item = (PinNumber, Level)>) -> Result<Self, PinholdError> {
        let mut entries: Vec<(PinNumber, Level)> = Vec::new();
        for (pin, level) in pairs {
            match entries.iter_mut().find(|(p, _)| *p == pin) {
                Some((_, existing)) => *existing = level,
                None => entries.push((pin, level)),
            }
        }
        if entries.is_empty() {
            return Err(PinholdError::EmptyBatch);
        }
        Ok(Self { entries })
    }

    /// Batch driving a single pin.
    #[must_use]
    pub fn single(pin: PinNumber, level: Level) -> Self {
        Self {
            entries: vec![(pin, level)],
        }
    }

    /// Entries in request order.
    #[must_use]
    pub fn entries(&self) -> &[(PinNumber, Level)] {
        &self.entries
    }

    /// Target pins in request order.
    #[must_use]
    pub fn pins(&self) -> Vec<PinNumber> {
        self.entries.iter().map(|(pin, _)| *pin).collect()
    }

    /// Canonical group key for the batch.
    #[must_use]
    pub fn group_key(&self) -> LineGroupKey {
        LineGroupKey::new(self.entries.iter().map(|(pin, _)| *pin))
    }

    /// The `pin=level` assignment tokens in request order, as passed to
    /// the holder tool and matched by pattern search.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(pin, level)| format!("{pin}={level}"))
            .collect()
    }
}
