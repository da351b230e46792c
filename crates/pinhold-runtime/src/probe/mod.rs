//! Read-only probing of line state via external tools.
//!
//! Tool invocation and output grammar are kept apart: [`GpiodProbe`] runs
//! the tools, the pure functions in [`parse`] turn their text into typed
//! results and are testable without spawning anything.

mod gpiod;
mod parse;

pub use gpiod::GpiodProbe;
pub use parse::{decode_level, parse_direction};
