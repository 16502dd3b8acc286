//! Script location and polling configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vmprov_core::ScriptKind;

use crate::ExecutorError;

/// Environment variable naming the directory that holds the scripts.
pub const SCRIPT_DIR_ENV: &str = "VMPROV_SCRIPT_DIR";

/// Default delay between `getvmip` attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default total budget for `getvmip` polling.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Where the delegated scripts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ScriptConfig {
    /// Directory containing the scripts.
    pub script_dir: PathBuf,

    /// File name of the `getvmip` script inside `script_dir`.
    pub get_vm_ip_script: String,

    /// File name of the `destroyvm` script inside `script_dir`.
    pub destroy_vm_script: String,
}

impl ScriptConfig {
    /// Uses the standard script file names inside `script_dir`.
    #[must_use]
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
            get_vm_ip_script: ScriptKind::GetVmIp.default_file_name().to_owned(),
            destroy_vm_script: ScriptKind::DestroyVm.default_file_name().to_owned(),
        }
    }

    /// Reads the script directory from [`SCRIPT_DIR_ENV`].
    ///
    /// # Errors
    /// Returns [`ExecutorError::MissingConfig`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, ExecutorError> {
        match std::env::var_os(SCRIPT_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::new(dir)),
            _ => Err(ExecutorError::MissingConfig { var: SCRIPT_DIR_ENV }),
        }
    }

    /// Overrides the file name used for one script.
    #[must_use]
    pub fn with_script(mut self, kind: ScriptKind, file_name: impl Into<String>) -> Self {
        match kind {
            ScriptKind::GetVmIp => self.get_vm_ip_script = file_name.into(),
            ScriptKind::DestroyVm => self.destroy_vm_script = file_name.into(),
        }
        self
    }

    /// Full path of the given script.
    #[must_use]
    pub fn script_path(&self, kind: ScriptKind) -> PathBuf {
        let file = match kind {
            ScriptKind::GetVmIp => &self.get_vm_ip_script,
            ScriptKind::DestroyVm => &self.destroy_vm_script,
        };
        self.script_dir.join(file)
    }

    /// Checks that both scripts exist.
    ///
    /// # Errors
    /// Returns [`ExecutorError::ScriptNotFound`] for the first missing script.
    pub fn verify(&self) -> Result<(), ExecutorError> {
        for kind in [ScriptKind::GetVmIp, ScriptKind::DestroyVm] {
            let path = self.script_path(kind);
            if !is_file(&path) {
                return Err(ExecutorError::ScriptNotFound { script: kind, path });
            }
        }
        Ok(())
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Timing of the `getvmip` poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollConfig {
    interval: Duration,
    timeout: Duration,
}

impl PollConfig {
    /// Creates a poll configuration.
    ///
    /// # Errors
    /// Returns [`ExecutorError::InvalidConfig`] if `interval` is zero, since
    /// the budget would then never shrink.
    pub fn new(interval: Duration, timeout: Duration) -> Result<Self, ExecutorError> {
        if interval.is_zero() {
            return Err(ExecutorError::InvalidConfig("poll interval must be non-zero".to_owned()));
        }
        Ok(Self { interval, timeout })
    }

    /// Same interval, different total budget.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, timeout: DEFAULT_POLL_TIMEOUT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_paths_join_directory_and_file_name() {
        let config = ScriptConfig::new("/harbor/shellscript");
        assert_eq!(
            config.script_path(ScriptKind::GetVmIp),
            PathBuf::from("/harbor/shellscript/getvmip.sh")
        );
        assert_eq!(
            config.script_path(ScriptKind::DestroyVm),
            PathBuf::from("/harbor/shellscript/destroyvm.sh")
        );
    }

    #[test]
    fn with_script_overrides_single_entry() {
        let config = ScriptConfig::new("/s").with_script(ScriptKind::DestroyVm, "rm-vm.sh");
        assert_eq!(config.script_path(ScriptKind::DestroyVm), PathBuf::from("/s/rm-vm.sh"));
        assert_eq!(config.script_path(ScriptKind::GetVmIp), PathBuf::from("/s/getvmip.sh"));
    }

    #[test]
    fn verify_reports_missing_script() {
        let config = ScriptConfig::new("/nonexistent/vmprov-scripts");
        assert!(matches!(
            config.verify(),
            Err(ExecutorError::ScriptNotFound { script: ScriptKind::GetVmIp, .. })
        ));
    }

    #[test]
    fn from_env_requires_non_empty_script_dir() {
        // The only test in this crate touching the variable.
        std::env::remove_var(SCRIPT_DIR_ENV);
        assert!(matches!(
            ScriptConfig::from_env(),
            Err(ExecutorError::MissingConfig { var: "VMPROV_SCRIPT_DIR" })
        ));

        std::env::set_var(SCRIPT_DIR_ENV, "");
        assert!(matches!(
            ScriptConfig::from_env(),
            Err(ExecutorError::MissingConfig { var: "VMPROV_SCRIPT_DIR" })
        ));

        std::env::set_var(SCRIPT_DIR_ENV, "/harbor/shellscript");
        let config = ScriptConfig::from_env();
        std::env::remove_var(SCRIPT_DIR_ENV);
        assert_eq!(config.ok().map(|c| c.script_dir), Some(PathBuf::from("/harbor/shellscript")));
    }

    #[test]
    fn poll_config_defaults() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval(), Duration::from_secs(10));
        assert_eq!(poll.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn poll_config_rejects_zero_interval() {
        assert!(matches!(
            PollConfig::new(Duration::ZERO, Duration::from_secs(60)),
            Err(ExecutorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn poll_config_with_timeout_keeps_interval() {
        let poll = PollConfig::default().with_timeout(Duration::from_secs(25));
        assert_eq!(poll.interval(), Duration::from_secs(10));
        assert_eq!(poll.timeout(), Duration::from_secs(25));
    }
}
