/// Errors produced by the `vmprov-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A VM name was empty or would split into several shell arguments.
    #[error("invalid VM name {name:?}: {reason}")]
    InvalidVmName { name: String, reason: &'static str },

    /// A connection field would split into several shell arguments.
    #[error("invalid connection field '{field}': {reason}")]
    InvalidConnection { field: &'static str, reason: &'static str },
}
