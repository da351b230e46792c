//! Error taxonomy for the supervision core.
//!
//! The propagation policy favors availability: probe and process-control
//! trouble degrades to safe defaults and a log line, because the control
//! layer must keep operating when a text probe misbehaves. Only an
//! unrecognized level encoding is surfaced, since silently guessing a
//! physical high/low is unsafe.

use thiserror::Error;

use crate::domain::PinNumber;

/// Errors surfaced by the supervision core.
#[derive(Debug, Error)]
pub enum PinholdError {
    /// Probe output was non-empty but matched no recognized level encoding.
    #[error("cannot decode level for pin {pin} from probe output {raw:?}")]
    Decode {
        /// Pin the probe was asked about.
        pin: PinNumber,
        /// Raw probe text that failed to decode.
        raw: String,
    },

    /// A drive request named no pins.
    #[error("drive request contains no pins")]
    EmptyBatch,

    /// The process registry could not be read or written.
    #[error("registry error: {0}")]
    Registry(String),

    /// The shadow state store could not be read or written.
    #[error("shadow state error: {0}")]
    Shadow(String),

    /// A holder process could not be confirmed terminated.
    ///
    /// Degraded to a warning inside drive/release paths; self-healing
    /// covers it on the next overlapping operation.
    #[error("process control failure: {0}")]
    Process(String),

    /// A holder process could not be spawned.
    ///
    /// `drive_many` itself degrades this to a warning; the variant exists
    /// for adapters that invoke the spawner directly.
    #[error("failed to spawn holder: {0}")]
    Spawn(String),
}

impl PinholdError {
    /// Helper for decode failures, trimming the raw text into the error.
    #[must_use]
    pub fn decode(pin: PinNumber, raw: &str) -> Self {
        Self::Decode {
            pin,
            raw: raw.trim().to_string(),
        }
    }
}
