//! Script runner abstraction and the shell-backed implementation.
//!
//! The lifecycle logic only needs "run this command line, give me stdout",
//! so tests can swap in a stub without touching the filesystem.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use vmprov_core::ScriptCommand;

use crate::ExecutorError;

/// Runs a [`ScriptCommand`] to completion and returns its standard output.
///
/// # Cancel Safety
/// Implementations must be cancel safe: dropping the future must not leave
/// the script, or anything it started, running.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run the command once.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Spawn`] if the command cannot be started and
    /// [`ExecutorError::ScriptFailed`] if it exits unsuccessfully.
    async fn run(&self, command: &ScriptCommand) -> Result<String, ExecutorError>;
}

/// Runs commands through a POSIX shell (`sh -c`).
///
/// The shell is what turns the `\!` password escape back into `!`, so the
/// rendered command must go through one.
///
/// Each script runs in its own process group. If the call is dropped before
/// the script exits the whole group gets `SIGKILL`, including anything the
/// script forked (e.g. `govc`).
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    /// Runner using `sh` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    /// Runner using a specific shell binary.
    #[must_use]
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptRunner for ShellRunner {
    async fn run(&self, command: &ScriptCommand) -> Result<String, ExecutorError> {
        let script = command.kind();
        tracing::debug!(%script, command = %command.redacted(), "running script");

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn { script, source })?;

        let mut group = ProcessGroupGuard::new(child.id());
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ExecutorError::Spawn { script, source })?;
        group.disarm();

        if !output.status.success() {
            return Err(ExecutorError::ScriptFailed {
                script,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(%script, bytes = stdout.len(), "script finished");
        Ok(stdout)
    }
}

/// Kills a process group on drop unless disarmed.
///
/// The group id equals the leader's pid because the leader was spawned with
/// `process_group(0)`.
struct ProcessGroupGuard {
    pgid: Option<libc::pid_t>,
}

impl ProcessGroupGuard {
    fn new(leader_pid: Option<u32>) -> Self {
        Self { pgid: leader_pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            tracing::debug!(pgid, "killing script process group");
            // SAFETY: kill(2) has no memory-safety preconditions; a negative
            // pid addresses the process group.
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
}
