//! VM lifecycle helper: IP polling and destruction via delegated scripts.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use vmprov_core::{
    classify_output, Connection, IpLookup, NotReady, OperationId, PollOutcome, Readiness,
    ScriptCommand, ScriptKind, VmName,
};

use crate::{ExecutorError, PollConfig, ScriptConfig, ScriptRunner};

/// Provisioning helper wrapping a [`ScriptRunner`].
///
/// Holds no per-VM state; every call builds its own command line from the
/// connection it is given.
pub struct VmLifecycle<R: ScriptRunner> {
    runner: R,
    scripts: ScriptConfig,
    poll: PollConfig,
}

impl<R: ScriptRunner> VmLifecycle<R> {
    /// Create a helper with the default poll timing (10 s interval, 600 s budget).
    #[must_use]
    pub fn new(runner: R, scripts: ScriptConfig) -> Self {
        Self { runner, scripts, poll: PollConfig::default() }
    }

    /// Create a helper with custom poll timing.
    #[must_use]
    pub fn with_poll_config(runner: R, scripts: ScriptConfig, poll: PollConfig) -> Self {
        Self { runner, scripts, poll }
    }

    #[cfg(test)]
    fn runner(&self) -> &R {
        &self.runner
    }

    /// Check that the configured scripts are present.
    ///
    /// # Errors
    /// Returns [`ExecutorError::ScriptNotFound`] for a missing script.
    pub fn health_check(&self) -> Result<(), ExecutorError> {
        self.scripts.verify()
    }

    fn command(&self, kind: ScriptKind, conn: &Connection, vm: &VmName) -> ScriptCommand {
        ScriptCommand::new(kind, self.scripts.script_path(kind), conn, vm)
    }

    /// Poll `getvmip` until the VM reports a real address or the budget runs out.
    ///
    /// Script failures, empty output and the placeholder hostname all count
    /// as "not yet": each costs one interval of budget. Errors are never
    /// returned; a VM that never comes up yields [`PollOutcome::TimedOut`].
    pub async fn get_vm_ip(&self, conn: &Connection, vm: &VmName) -> PollOutcome {
        self.get_vm_ip_until(conn, vm, &CancellationToken::new()).await
    }

    /// Like [`get_vm_ip`](Self::get_vm_ip), but returns
    /// [`PollOutcome::Cancelled`] as soon as `cancel` fires, whether the loop
    /// is sleeping or a script is running. A running script is killed.
    pub async fn get_vm_ip_until(
        &self,
        conn: &Connection,
        vm: &VmName,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let operation_id = OperationId::new();
        let span = tracing::info_span!("get_vm_ip", %operation_id, vm = %vm);
        self.poll_ip(operation_id, conn, vm, cancel).instrument(span).await
    }

    async fn poll_ip(
        &self,
        operation_id: OperationId,
        conn: &Connection,
        vm: &VmName,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let command = self.command(ScriptKind::GetVmIp, conn, vm);
        let interval = self.poll.interval();
        let started_at = Utc::now();
        let wall_start = Instant::now();

        let mut remaining = self.poll.timeout();
        let mut attempts = 0u32;
        let mut last_observation = None;

        tracing::info!(
            command = %command.redacted(),
            timeout_secs = remaining.as_secs(),
            "waiting for VM address"
        );

        loop {
            if remaining.is_zero() {
                tracing::info!(attempts, last = ?last_observation, "timed out waiting for VM address");
                return PollOutcome::TimedOut { attempts, last_observation };
            }

            if cancel.is_cancelled() {
                return cancelled(attempts);
            }

            attempts += 1;
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return cancelled(attempts),
                result = self.runner.run(&command) => result,
            };

            let observation = match result.map(|out| classify_output(&out)) {
                Ok(Readiness::Ready(ip)) => {
                    let elapsed = wall_start.elapsed();
                    tracing::info!(%ip, attempts, elapsed_ms = elapsed.as_millis(), "VM address ready");
                    return PollOutcome::Ready(IpLookup::new(
                        operation_id,
                        vm.clone(),
                        ip,
                        attempts,
                        remaining,
                        started_at,
                        elapsed,
                    ));
                }
                Ok(Readiness::Empty) => NotReady::Empty,
                Ok(Readiness::Placeholder) => NotReady::Placeholder,
                Err(e) => {
                    tracing::warn!(attempt = attempts, error = %e, "getvmip failed, will retry");
                    NotReady::ToolFailed(e.to_string())
                }
            };

            remaining = remaining.saturating_sub(interval);
            tracing::debug!(
                attempt = attempts,
                observation = %observation,
                remaining_secs = remaining.as_secs(),
                "VM address not ready"
            );
            last_observation = Some(observation);

            if !remaining.is_zero() && !sleep_or_cancel(interval, cancel).await {
                return cancelled(attempts);
            }
        }
    }

    /// Run `destroyvm` once and return what it printed.
    ///
    /// # Errors
    /// Propagates the runner's error unchanged; there is no retry.
    pub async fn destroy_vm(&self, conn: &Connection, vm: &VmName) -> Result<String, ExecutorError> {
        let operation_id = OperationId::new();
        let command = self.command(ScriptKind::DestroyVm, conn, vm);

        tracing::info!(%operation_id, vm = %vm, command = %command.redacted(), "destroying VM");

        match self.runner.run(&command).await {
            Ok(output) => {
                tracing::info!(%operation_id, vm = %vm, "destroy script finished");
                Ok(output)
            }
            Err(e) => {
                tracing::warn!(%operation_id, vm = %vm, error = %e, "destroy script failed");
                Err(e)
            }
        }
    }
}

/// Returns `false` if `cancel` fired before `interval` elapsed.
async fn sleep_or_cancel(interval: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(interval) => true,
    }
}

fn cancelled(attempts: u32) -> PollOutcome {
    tracing::info!(attempts, "VM address poll cancelled");
    PollOutcome::Cancelled { attempts }
}
