//! Runner configuration

use std::path::PathBuf;

/// Where a runner writes its log files and runs its child process.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory for the per-instance `.out.log` / `.err.log` pair.
    pub log_dir: PathBuf,
    /// Working directory of the child process.
    pub working_dir: PathBuf,
}

impl RunnerConfig {
    /// Create a configuration with default paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log directory (fluent API)
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Set the child working directory (fluent API)
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("log"),
            working_dir: PathBuf::from("."),
        }
    }
}
