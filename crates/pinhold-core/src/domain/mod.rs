//! Domain types for GPIO line supervision.
//!
//! These are pure value types with no infrastructure dependencies.

mod group;
mod pin;

pub use group::{LevelBatch, LineGroupKey};
pub use pin::{Direction, Level, PinNumber, PinSnapshot};
