//! Correlation id for lifecycle calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tags every log line of one `get-vm-ip` or `destroy-vm` call, and is
/// recorded in [`IpLookup`](crate::IpLookup) so a result can be matched to
/// its log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Fresh random id for a new call.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
