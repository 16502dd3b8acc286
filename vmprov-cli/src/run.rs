//! Dispatch of parsed CLI commands.

use std::io::Write;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vmprov_core::{escape_password, Connection, PollOutcome, VmName};
use vmprov_executor::{PollConfig, ScriptConfig, ShellRunner, VmLifecycle};

use crate::{Cli, CliError, Command, TargetArgs};

/// Process exit status for success.
pub const EXIT_OK: u8 = 0;
/// Process exit status when `get-ip` ran out of budget.
pub const EXIT_TIMED_OUT: u8 = 1;
/// Process exit status when `get-ip` was interrupted.
pub const EXIT_CANCELLED: u8 = 130;

/// Execute `cli`, writing command output to `out`.
///
/// Returns the process exit status.
///
/// # Errors
/// Returns [`CliError`] for invalid arguments, missing configuration,
/// a failed `destroy`, or a write failure.
pub async fn run(cli: Cli, cancel: &CancellationToken, out: &mut dyn Write) -> Result<u8, CliError> {
    match cli.command {
        Command::EscapePassword { password } => {
            writeln!(out, "{}", escape_password(&password))?;
            Ok(EXIT_OK)
        }
        Command::Check => {
            let scripts = script_config(cli.script_dir)?;
            scripts.verify()?;
            writeln!(out, "scripts found in {}", scripts.script_dir.display())?;
            Ok(EXIT_OK)
        }
        Command::Destroy { target } => {
            let (conn, vm) = target_of(target)?;
            let lifecycle = VmLifecycle::new(ShellRunner::new(), script_config(cli.script_dir)?);
            let output = lifecycle.destroy_vm(&conn, &vm).await?;
            out.write_all(output.as_bytes())?;
            Ok(EXIT_OK)
        }
        Command::GetIp { target, timeout, interval, json } => {
            let (conn, vm) = target_of(target)?;
            let poll = PollConfig::new(Duration::from_secs(interval), Duration::from_secs(timeout))?;
            let lifecycle =
                VmLifecycle::with_poll_config(ShellRunner::new(), script_config(cli.script_dir)?, poll);

            let outcome = lifecycle.get_vm_ip_until(&conn, &vm, cancel).await;
            tracing::info!(vm = %vm, status = outcome.status_code(), attempts = outcome.attempts(), "get-ip finished");

            if json {
                serde_json::to_writer_pretty(&mut *out, &outcome)?;
                writeln!(out)?;
            } else if let PollOutcome::Ready(lookup) = &outcome {
                writeln!(out, "{}", lookup.ip)?;
            }

            Ok(match outcome {
                PollOutcome::Ready(_) => EXIT_OK,
                PollOutcome::TimedOut { .. } => EXIT_TIMED_OUT,
                PollOutcome::Cancelled { .. } => EXIT_CANCELLED,
            })
        }
    }
}

fn script_config(dir: Option<std::path::PathBuf>) -> Result<ScriptConfig, CliError> {
    match dir {
        Some(dir) => Ok(ScriptConfig::new(dir)),
        None => Ok(ScriptConfig::from_env()?),
    }
}

fn target_of(target: TargetArgs) -> Result<(Connection, VmName), CliError> {
    let conn = Connection::new(target.host, target.user, target.password)?;
    let vm = VmName::new(target.vm)?;
    Ok((conn, vm))
}
