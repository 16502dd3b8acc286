//! Core types for the vmprov VM provisioning helper.
//!
//! Defines connection descriptors, script command construction, and the
//! interpretation of `getvmip` output. Nothing in this crate performs I/O.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod command;
pub mod connection;
pub mod error;
pub mod id;
pub mod lookup;
pub mod readiness;

pub use command::{escape_password, ScriptCommand, ScriptKind};
pub use connection::{Connection, VmName};
pub use error::CoreError;
pub use id::OperationId;
pub use lookup::{IpLookup, NotReady, PollOutcome, STATUS_CANCELLED, STATUS_READY, STATUS_TIMED_OUT};
pub use readiness::{classify_output, Readiness, PLACEHOLDER_HOSTNAME};
