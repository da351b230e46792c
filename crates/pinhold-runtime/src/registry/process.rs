//! Signal-based process control and pattern search for holders.

use std::ffi::OsStr;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::System;
use tokio::time::sleep;
use tracing::{debug, warn};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

use pinhold_core::domain::PinNumber;
use pinhold_core::error::PinholdError;
use pinhold_core::ports::ProcessControl;
use pinhold_core::settings::Settings;

/// Process control via unix signals plus `sysinfo` pattern search.
pub struct SignalProcessControl {
    hold_tool: String,
    chip: String,
    terminate_polls: u32,
    terminate_poll_ms: u64,
}

impl SignalProcessControl {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            hold_tool: settings.hold_tool().to_string(),
            chip: settings.chip().to_string(),
            terminate_polls: settings.terminate_polls.unwrap_or(25),
            terminate_poll_ms: settings.terminate_poll_ms.unwrap_or(20),
        }
    }

    /// Check process existence with the null signal.
    ///
    /// A zombie still accepts signals but is already dead for our
    /// purposes: it holds no lines and can never exit again, so it
    /// counts as gone.
    #[cfg(unix)]
    fn pid_exists(pid: u32) -> bool {
        match signal::kill(Pid::from_raw(pid as i32), None) {
            Ok(()) => !Self::is_zombie(pid),
            Err(Errno::ESRCH) => false, // No such process
            Err(_) => !Self::is_zombie(pid), // Exists but we lack permission
        }
    }

    /// Read the process state from `/proc/<pid>/stat` (state `Z` means
    /// exited but not yet reaped).
    #[cfg(unix)]
    fn is_zombie(pid: u32) -> bool {
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
            return false;
        };
        // The state field follows the parenthesised command name, which
        // may itself contain parentheses.
        stat.rsplit(')')
            .next()
            .and_then(|rest| rest.trim_start().chars().next())
            .is_some_and(|state| state == 'Z')
    }

    #[cfg(not(unix))]
    fn pid_exists(_pid: u32) -> bool {
        false
    }

    /// Poll for process exit for the configured bounded window.
    #[cfg(unix)]
    async fn wait_for_exit(&self, pid: u32) -> bool {
        for _ in 0..self.terminate_polls {
            sleep(Duration::from_millis(self.terminate_poll_ms)).await;
            if !Self::pid_exists(pid) {
                return true;
            }
        }
        false
    }

    /// True when a process looks like one of our holder invocations:
    /// the holder tool, pointed at our chip.
    fn is_holder_process(&self, cmd: &[std::ffi::OsString]) -> bool {
        let Some(argv0) = cmd.first() else {
            return false;
        };
        let tool = std::path::Path::new(argv0)
            .file_name()
            .unwrap_or_else(|| OsStr::new(""));
        tool == OsStr::new(&self.hold_tool)
            && cmd.iter().any(|arg| arg == OsStr::new(&self.chip))
    }
}

#[async_trait]
impl ProcessControl for SignalProcessControl {
    async fn is_alive(&self, pid: u32) -> bool {
        Self::pid_exists(pid)
    }

    async fn is_holder(&self, pid: u32) -> bool {
        if !Self::pid_exists(pid) {
            return false;
        }
        let sys_pid = sysinfo::Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[sys_pid]), false);
        system
            .process(sys_pid)
            .is_some_and(|process| self.is_holder_process(process.cmd()))
    }

    #[cfg(unix)]
    async fn terminate(&self, pid: u32) -> Result<(), PinholdError> {
        let nix_pid = Pid::from_raw(pid as i32);

        // Phase 1: graceful stop
        if let Err(e) = signal::kill(nix_pid, Signal::SIGTERM) {
            if e == Errno::ESRCH {
                return Ok(()); // already gone
            }
            return Err(PinholdError::Process(e.to_string()));
        }
        if self.wait_for_exit(pid).await {
            return Ok(());
        }

        // Phase 2: forceful kill
        debug!(pid = %pid, "Holder ignored graceful stop, escalating to kill");
        if let Err(e) = signal::kill(nix_pid, Signal::SIGKILL) {
            if e == Errno::ESRCH {
                return Ok(());
            }
            return Err(PinholdError::Process(e.to_string()));
        }
        if self.wait_for_exit(pid).await {
            return Ok(());
        }

        warn!(pid = %pid, "Process did not exit after forceful kill");
        Err(PinholdError::Process(format!(
            "process {pid} did not exit after forceful kill"
        )))
    }

    #[cfg(not(unix))]
    async fn terminate(&self, _pid: u32) -> Result<(), PinholdError> {
        Err(PinholdError::Process(
            "process control not implemented on this platform".to_string(),
        ))
    }

    async fn find_by_pin(&self, pin: PinNumber) -> Option<u32> {
        let mut system = System::new_all();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, false);

        let prefix = format!("{pin}=");
        for (pid, process) in system.processes() {
            let cmd = process.cmd();
            if !self.is_holder_process(cmd) {
                continue;
            }
            let holds_pin = cmd
                .iter()
                .filter_map(|arg| arg.to_str())
                .any(|arg| arg.strip_prefix(&prefix).is_some_and(|v| v == "0" || v == "1"));
            if holds_pin {
                debug!(pin = %pin, pid = %pid.as_u32(), "Pattern search found unregistered holder");
                return Some(pid.as_u32());
            }
        }
        None
    }
}
