//! Command-line construction for the delegated shell scripts.
//!
//! Arguments are joined with single spaces and are not quoted. The only
//! transformation applied is [`escape_password`], because the shell treats
//! `!` as history expansion.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::connection::{Connection, VmName};

/// Replaces every `!` in `password` with `\!`.
///
/// All other characters pass through untouched.
#[must_use]
pub fn escape_password(password: &str) -> String {
    password.replace('!', "\\!")
}

/// The external scripts this helper delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptKind {
    /// Prints the VM's IP address, the placeholder hostname, or nothing.
    GetVmIp,
    /// Destroys the VM and prints a human-readable result.
    DestroyVm,
}

impl ScriptKind {
    /// File name of the script inside the script directory.
    #[must_use]
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::GetVmIp => "getvmip.sh",
            Self::DestroyVm => "destroyvm.sh",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GetVmIp => "getvmip",
            Self::DestroyVm => "destroyvm",
        })
    }
}

/// A fully built script invocation.
///
/// `Display` renders the exact shell string that gets executed, so it
/// contains the (escaped) password. Use [`ScriptCommand::redacted`] for logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    kind: ScriptKind,
    script: PathBuf,
    host: String,
    user: String,
    escaped_password: String,
    vm_name: VmName,
}

impl ScriptCommand {
    /// Builds the invocation `<script> <host> <user> <escaped-password> <vm>`.
    #[must_use]
    pub fn new(kind: ScriptKind, script: impl Into<PathBuf>, conn: &Connection, vm: &VmName) -> Self {
        Self {
            kind,
            script: script.into(),
            host: conn.host.clone(),
            user: conn.user.clone(),
            escaped_password: escape_password(&conn.password),
            vm_name: vm.clone(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Renders the command with the password replaced by `***`.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!(
            "{} {} {} *** {}",
            self.script.display(),
            self.host,
            self.user,
            self.vm_name
        )
    }
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.script.display(),
            self.host,
            self.user,
            self.escaped_password,
            self.vm_name
        )
    }
}

impl fmt::Debug for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScriptCommand").field(&self.redacted()).finish()
    }
}
