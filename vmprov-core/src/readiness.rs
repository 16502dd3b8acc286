//! Interpretation of `getvmip` script output.

use serde::{Deserialize, Serialize};

/// Hostname the platform reports before the guest has a real address.
pub const PLACEHOLDER_HOSTNAME: &str = "photon-machine";

/// What a single `getvmip` run told us about the VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Readiness {
    /// The script printed a real address.
    Ready(String),
    /// The script printed nothing.
    Empty,
    /// The script printed [`PLACEHOLDER_HOSTNAME`].
    Placeholder,
}

/// Classifies captured script output.
///
/// Surrounding whitespace, including the trailing newline the script
/// prints, is ignored. The placeholder must match exactly after trimming.
#[must_use]
pub fn classify_output(output: &str) -> Readiness {
    match output.trim() {
        "" => Readiness::Empty,
        PLACEHOLDER_HOSTNAME => Readiness::Placeholder,
        ip => Readiness::Ready(ip.to_owned()),
    }
}
