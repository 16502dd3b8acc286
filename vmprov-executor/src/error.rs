//! Error types for the executor crate.

use std::path::PathBuf;

use vmprov_core::{CoreError, ScriptKind};

/// Errors that can occur while running lifecycle scripts.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutorError {
    /// The shell could not be started.
    #[error("failed to run {script} script: {source}")]
    Spawn {
        script: ScriptKind,
        #[source]
        source: std::io::Error,
    },

    /// The script ran but exited unsuccessfully.
    #[error("{script} script {}: {stderr}", describe_status(*status))]
    ScriptFailed {
        script: ScriptKind,
        /// Exit code, or `None` if the script was killed by a signal.
        status: Option<i32>,
        stderr: String,
    },

    /// A script file is missing from the script directory.
    #[error("{script} script not found at {}", path.display())]
    ScriptNotFound { script: ScriptKind, path: PathBuf },

    /// A required environment variable is not set.
    #[error("missing configuration: environment variable {var} is not set")]
    MissingConfig { var: &'static str },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid connection or VM name.
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_owned(),
    }
}
