//! Runner-specific error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("invalid command {command:?}: {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("{runner} failed to stop: process is still running")]
    StillRunning { runner: String },

    #[error("signal delivery to pid {pid} failed")]
    Signal {
        pid: i32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RunnerResult<T> = Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_command_mentions_the_command() {
        let err = RunnerError::InvalidCommand {
            command: "true && false".to_string(),
            reason: "chained commands are not allowed".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("true && false"));
        assert!(message.contains("chained commands"));
    }

    #[test]
    fn still_running_identifies_the_runner() {
        let err = RunnerError::StillRunning {
            runner: "sleeper-3 (pid 4242)".to_string(),
        };
        assert!(err.to_string().contains("sleeper-3 (pid 4242)"));
    }
}
