//! Error types for the CLI crate.

/// Errors surfaced to the `vmprov` binary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CliError {
    /// An error propagated from the executor layer.
    #[error(transparent)]
    Executor(#[from] vmprov_executor::ExecutorError),

    /// Invalid connection arguments or VM name.
    #[error(transparent)]
    Core(#[from] vmprov_core::CoreError),

    /// Failed to encode JSON output.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write to stdout.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
