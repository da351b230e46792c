//! Probe implementation over the libgpiod command-line tools.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use pinhold_core::domain::{Direction, PinNumber};
use pinhold_core::ports::{LevelProbe, LineInfoProbe};
use pinhold_core::settings::Settings;

use super::parse::parse_direction;

/// Runs `gpioinfo` / `gpioget` and hands their text to the pure parsers.
///
/// Tool output is untrusted; every failure mode (tool missing, nonzero
/// exit, unreadable output) degrades to the safe default of the
/// respective port.
pub struct GpiodProbe {
    chip: String,
    info_tool: String,
    read_tool: String,
}

impl GpiodProbe {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            chip: settings.chip().to_string(),
            info_tool: settings.info_tool().to_string(),
            read_tool: settings.read_tool().to_string(),
        }
    }

    /// Run a tool, returning its stdout only on a clean zero exit.
    async fn run(tool: &str, args: &[&str]) -> Option<String> {
        let output = match Command::new(tool).args(args).output().await {
            Ok(output) => output,
            Err(e) => {
                debug!(tool = %tool, error = %e, "Probe tool failed to run");
                return None;
            }
        };
        if !output.status.success() {
            debug!(tool = %tool, status = %output.status, "Probe tool exited nonzero");
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl LineInfoProbe for GpiodProbe {
    async fn direction(&self, pin: PinNumber) -> Direction {
        match Self::run(&self.info_tool, &[self.chip.as_str()]).await {
            Some(text) => parse_direction(pin, &text),
            None => Direction::Input,
        }
    }
}

#[async_trait]
impl LevelProbe for GpiodProbe {
    async fn read_raw(&self, pin: PinNumber) -> Option<String> {
        let pin_arg = pin.to_string();
        Self::run(&self.read_tool, &[self.chip.as_str(), pin_arg.as_str()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_info_tool_degrades_to_input() {
        let probe = GpiodProbe {
            chip: "gpiochip0".to_string(),
            info_tool: "pinhold-no-such-tool".to_string(),
            read_tool: "pinhold-no-such-tool".to_string(),
        };
        assert_eq!(probe.direction(7).await, Direction::Input);
        assert_eq!(probe.read_raw(7).await, None);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn clean_exit_yields_stdout() {
        let text = GpiodProbe::run("echo", &["line 7: output"]).await;
        assert_eq!(text, Some("line 7: output\n".to_string()));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn nonzero_exit_yields_none() {
        assert_eq!(GpiodProbe::run("false", &[]).await, None);
    }
}
