//! Results of a `get-vm-ip` poll.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::connection::VmName;
use crate::id::OperationId;

/// Status code reported for a successful lookup.
pub const STATUS_READY: i32 = 0;
/// Status code reported when the timeout budget ran out.
pub const STATUS_TIMED_OUT: i32 = -1;
/// Status code reported when the caller aborted the poll.
pub const STATUS_CANCELLED: i32 = -2;

/// Record of a successful IP lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct IpLookup {
    /// Identifier of the lifecycle call that produced this record.
    pub operation_id: OperationId,
    /// The VM that was queried.
    pub vm_name: VmName,
    /// Address printed by the script, trimmed.
    pub ip: String,
    /// Number of script runs, including the successful one.
    pub attempts: u32,
    /// Timeout budget left when the address appeared.
    pub budget_remaining: Duration,
    /// When polling began.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time spent polling.
    pub elapsed: Duration,
}

impl IpLookup {
    #[must_use]
    pub fn new(
        operation_id: OperationId,
        vm_name: VmName,
        ip: String,
        attempts: u32,
        budget_remaining: Duration,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        Self { operation_id, vm_name, ip, attempts, budget_remaining, started_at, elapsed }
    }
}

/// Why the most recent attempt did not yield an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
#[non_exhaustive]
pub enum NotReady {
    /// The script could not be run or exited unsuccessfully.
    ToolFailed(String),
    /// The script succeeded but printed nothing.
    Empty,
    /// The script printed the placeholder hostname.
    Placeholder,
}

impl std::fmt::Display for NotReady {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToolFailed(reason) => write!(f, "script failed: {reason}"),
            Self::Empty => f.write_str("no address yet"),
            Self::Placeholder => f.write_str("placeholder hostname"),
        }
    }
}

/// Final result of a `get-vm-ip` poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    /// The VM reported a real address.
    Ready(IpLookup),
    /// The budget was exhausted first.
    TimedOut {
        attempts: u32,
        /// `None` when the budget was already exhausted before the first run.
        last_observation: Option<NotReady>,
    },
    /// The caller cancelled the poll.
    Cancelled { attempts: u32 },
}

impl PollOutcome {
    /// Integer status for callers that only check a return code:
    /// `0` ready, `-1` timed out, `-2` cancelled.
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            Self::Ready(_) => STATUS_READY,
            Self::TimedOut { .. } => STATUS_TIMED_OUT,
            Self::Cancelled { .. } => STATUS_CANCELLED,
        }
    }

    /// The lookup record, if the poll succeeded.
    #[must_use]
    pub fn lookup(&self) -> Option<&IpLookup> {
        match self {
            Self::Ready(lookup) => Some(lookup),
            _ => None,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready(lookup) => lookup.attempts,
            Self::TimedOut { attempts, .. } | Self::Cancelled { attempts } => *attempts,
        }
    }
}
