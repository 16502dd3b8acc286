//! Command-line front end for the vmprov lifecycle helpers.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod error;
pub mod run;

pub use cli::{Cli, Command, TargetArgs};
pub use error::CliError;
pub use run::{run, EXIT_CANCELLED, EXIT_OK, EXIT_TIMED_OUT};
