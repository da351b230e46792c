//! Settings for the supervision core.
//!
//! Pure domain types with no infrastructure dependencies. All fields are
//! optional to support partial configuration with graceful defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default GPIO chip the external tools are pointed at.
pub const DEFAULT_CHIP: &str = "gpiochip0";

/// Default line-info tool (reports direction per line).
pub const DEFAULT_INFO_TOOL: &str = "gpioinfo";

/// Default line-read tool (prints an input line's level).
pub const DEFAULT_READ_TOOL: &str = "gpioget";

/// Default line-holder tool (drives lines for as long as it runs).
pub const DEFAULT_HOLD_TOOL: &str = "gpioset";

/// Supervision settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// GPIO chip identifier passed to every tool invocation.
    pub chip: Option<String>,

    /// Line-info tool name or path.
    pub info_tool: Option<String>,

    /// Line-read tool name or path.
    pub read_tool: Option<String>,

    /// Line-holder tool name or path.
    pub hold_tool: Option<String>,

    /// Override for the data root (markers, shadow state).
    pub data_dir: Option<PathBuf>,

    /// Polls to wait for exit after a graceful-stop signal before
    /// escalating to a forceful kill.
    pub terminate_polls: Option<u32>,

    /// Interval between termination polls, in milliseconds.
    pub terminate_poll_ms: Option<u64>,

    /// Attempts at post-spawn holder pid discovery.
    pub discovery_polls: Option<u32>,

    /// Interval between discovery attempts, in milliseconds.
    pub discovery_poll_ms: Option<u64>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            chip: Some(DEFAULT_CHIP.to_string()),
            info_tool: Some(DEFAULT_INFO_TOOL.to_string()),
            read_tool: Some(DEFAULT_READ_TOOL.to_string()),
            hold_tool: Some(DEFAULT_HOLD_TOOL.to_string()),
            data_dir: None,
            terminate_polls: Some(25),
            terminate_poll_ms: Some(20),
            discovery_polls: Some(10),
            discovery_poll_ms: Some(30),
        }
    }

    /// Chip identifier, falling back to the default.
    #[must_use]
    pub fn chip(&self) -> &str {
        self.chip.as_deref().unwrap_or(DEFAULT_CHIP)
    }

    /// Line-info tool, falling back to the default.
    #[must_use]
    pub fn info_tool(&self) -> &str {
        self.info_tool.as_deref().unwrap_or(DEFAULT_INFO_TOOL)
    }

    /// Line-read tool, falling back to the default.
    #[must_use]
    pub fn read_tool(&self) -> &str {
        self.read_tool.as_deref().unwrap_or(DEFAULT_READ_TOOL)
    }

    /// Line-holder tool, falling back to the default.
    #[must_use]
    pub fn hold_tool(&self) -> &str {
        self.hold_tool.as_deref().unwrap_or(DEFAULT_HOLD_TOOL)
    }
}

/// Validation errors for settings updates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The chip identifier was present but empty.
    #[error("chip identifier cannot be empty")]
    EmptyChip,

    /// A tool name was present but empty.
    #[error("tool name cannot be empty: {0}")]
    EmptyTool(&'static str),
}

/// Validate a settings value before applying it.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if matches!(settings.chip.as_deref(), Some("")) {
        return Err(SettingsError::EmptyChip);
    }
    for (field, value) in [
        ("info_tool", settings.info_tool.as_deref()),
        ("read_tool", settings.read_tool.as_deref()),
        ("hold_tool", settings.hold_tool.as_deref()),
    ] {
        if matches!(value, Some("")) {
            return Err(SettingsError::EmptyTool(field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_the_gpiod_tools() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.chip(), "gpiochip0");
        assert_eq!(settings.info_tool(), "gpioinfo");
        assert_eq!(settings.read_tool(), "gpioget");
        assert_eq!(settings.hold_tool(), "gpioset");
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn empty_settings_fall_back_to_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chip(), DEFAULT_CHIP);
        assert_eq!(settings.hold_tool(), DEFAULT_HOLD_TOOL);
    }

    #[test]
    fn validation_rejects_empty_names() {
        let settings = Settings {
            chip: Some(String::new()),
            ..Settings::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::EmptyChip));

        let settings = Settings {
            hold_tool: Some(String::new()),
            ..Settings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyTool("hold_tool"))
        );
    }
}
