//! Pure parsers for the probe tools' text output.

use pinhold_core::domain::{Direction, Level, PinNumber};
use pinhold_core::error::PinholdError;

/// Token marking a line as output in the info tool's per-line record.
const OUTPUT_MARKER: &str = "output";

/// Decide a pin's direction from the info tool's multi-line output.
///
/// Isolates the record matching `line <n>:` and reports [`Direction::Output`]
/// only when that record carries the output marker token. No matching
/// record, empty text or anything ambiguous is [`Direction::Input`]: the
/// safe default is to never claim a line is drivable output when uncertain.
#[must_use]
pub fn parse_direction(pin: PinNumber, info_text: &str) -> Direction {
    let pin_str = pin.to_string();
    for record in info_text.lines() {
        let Some(rest) = record.trim_start().strip_prefix("line") else {
            continue;
        };
        // Exact offset match: "line   7:" must not match pin 7 against 70.
        let Some(after_pin) = rest.trim_start().strip_prefix(pin_str.as_str()) else {
            continue;
        };
        if !after_pin.starts_with(':') {
            continue;
        }
        if record.contains(OUTPUT_MARKER) {
            return Direction::Output;
        }
        return Direction::Input;
    }
    Direction::Input
}

/// Decode an input line's level from the read tool's output.
///
/// Accepted encodings: bare `0`/`1`, case-insensitive `active`/`inactive`,
/// and assignment forms naming the probed pin (`"7"=active`, `7=1`).
/// Empty text decodes to low (an unconfigured line has no meaningful
/// level). Any other non-empty text is a decode failure carrying the pin
/// and the raw text.
pub fn decode_level(pin: PinNumber, raw: &str) -> Result<Level, PinholdError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Level::Low);
    }

    let quoted = format!("\"{pin}\"=");
    let bare = format!("{pin}=");
    let value = text
        .strip_prefix(&quoted)
        .or_else(|| text.strip_prefix(&bare))
        .unwrap_or(text)
        .trim();

    match value.to_ascii_lowercase().as_str() {
        "0" | "inactive" => Ok(Level::Low),
        "1" | "active" => Ok(Level::High),
        _ => Err(PinholdError::decode(pin, raw)),
    }
}
