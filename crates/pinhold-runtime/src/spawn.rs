//! Detached holder process spawning.

use std::process::{Command, Stdio};

use async_trait::async_trait;
use sysinfo::System;
use tracing::debug;

use pinhold_core::domain::LevelBatch;
use pinhold_core::error::PinholdError;
use pinhold_core::ports::HolderSpawner;
use pinhold_core::settings::Settings;

/// Spawns the holder tool (`gpioset --mode=signal`) fully detached.
///
/// The holder must outlive the caller and must not inherit or block on
/// the caller's standard streams, so it gets its own process group and
/// null stdio. The child handle moves into a background wait task that
/// reaps the process when it exits; an unreaped zombie would otherwise
/// keep answering liveness probes.
pub struct HolderToolSpawner {
    hold_tool: String,
    chip: String,
}

impl HolderToolSpawner {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            hold_tool: settings.hold_tool().to_string(),
            chip: settings.chip().to_string(),
        }
    }
}

#[async_trait]
impl HolderSpawner for HolderToolSpawner {
    async fn spawn(&self, batch: &LevelBatch) -> Result<Option<u32>, PinholdError> {
        let mut cmd = Command::new(&self.hold_tool);
        cmd.arg("--mode=signal").arg(&self.chip);
        for assignment in batch.assignments() {
            cmd.arg(assignment);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group: the holder must survive caller exit and
        // stay out of terminal signal delivery.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = tokio::process::Command::from(cmd)
            .spawn()
            .map_err(|e| PinholdError::Spawn(e.to_string()))?;
        let pid = child.id();
        debug!(key = %batch.group_key(), pid = ?pid, "Spawned holder");

        // Fire-and-forget, but still reaped: the wait task collects the
        // exit status whenever the holder dies so its pid is released.
        tokio::spawn(async move {
            let _ = child.wait().await;
        });
        Ok(pid)
    }

    async fn find_holder(&self, batch: &LevelBatch) -> Option<u32> {
        let assignments = batch.assignments();
        let mut system = System::new_all();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, false);

        for (pid, process) in system.processes() {
            let cmd = process.cmd();
            let Some(argv0) = cmd.first() else { continue };
            let tool = std::path::Path::new(argv0).file_name();
            if tool != Some(std::ffi::OsStr::new(&self.hold_tool)) {
                continue;
            }
            if !cmd.iter().any(|arg| arg == std::ffi::OsStr::new(&self.chip)) {
                continue;
            }
            let has_all = assignments
                .iter()
                .all(|a| cmd.iter().any(|arg| arg == std::ffi::OsStr::new(a)));
            if has_all {
                return Some(pid.as_u32());
            }
        }
        None
    }
}
