//! Connection descriptor and VM reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Credentials for the virtualization management endpoint.
///
/// Supplied per call and never retained by the lifecycle helpers.
/// `Debug` redacts the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Connection {
    /// Management endpoint address (e.g. a vCenter URL or host name).
    pub host: String,
    /// Login user name.
    pub user: String,
    /// Login password, unescaped.
    pub password: String,
}

impl Connection {
    /// Creates a connection descriptor.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConnection`] if `host` or `user` is empty
    /// or contains whitespace. The scripts take positional arguments, so such
    /// a value would shift every argument after it.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let host = host.into();
        let user = user.into();
        check_single_arg("host", &host)?;
        check_single_arg("user", &user)?;
        Ok(Self { host, user, password: password.into() })
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

fn check_single_arg(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::InvalidConnection { field, reason: "must not be empty" });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidConnection { field, reason: "must not contain whitespace" });
    }
    Ok(())
}

/// Name of a virtual machine in the virtualization platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VmName(String);

impl VmName {
    /// Creates a validated `VmName`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidVmName`] if the name is empty or contains
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidVmName { name, reason: "must not be empty" });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidVmName { name, reason: "must not contain whitespace" });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VmName {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VmName> for String {
    fn from(name: VmName) -> Self {
        name.0
    }
}

impl std::str::FromStr for VmName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
