//! Script-driven VM lifecycle operations for vmprov.
//!
//! Runs the external `getvmip` / `destroyvm` scripts, polls for a VM's
//! address with a bounded budget, and reports outcomes as typed values.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod runner;

pub use config::{PollConfig, ScriptConfig, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, SCRIPT_DIR_ENV};
pub use error::ExecutorError;
pub use lifecycle::VmLifecycle;
pub use runner::{ScriptRunner, ShellRunner};
