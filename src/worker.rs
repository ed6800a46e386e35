//! Worker task: validate, launch, and reap one child process
//!
//! Launch setup runs under a process-wide lock so that concurrent runners
//! cannot interleave log-handle bookkeeping or race the spawn itself. The
//! lock covers setup only; once spawned, children run concurrently.

use std::process::Stdio;
use std::sync::{Arc, OnceLock};

use nix::unistd::Pid;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{RunnerError, RunnerResult};
use crate::logs;
use crate::runner::RunnerInner;

/// One launch critical section at a time, process-wide.
static LAUNCH_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn launch_lock() -> &'static Mutex<()> {
    LAUNCH_LOCK.get_or_init(|| Mutex::new(()))
}

/// Reject anything that is not a single shell command.
pub(crate) fn validate(command: &str) -> RunnerResult<()> {
    if command.trim().is_empty() {
        return Err(RunnerError::InvalidCommand {
            command: command.to_string(),
            reason: "command is empty".to_string(),
        });
    }
    if command.contains("&&") || command.contains(';') {
        return Err(RunnerError::InvalidCommand {
            command: command.to_string(),
            reason: "chained commands are not allowed".to_string(),
        });
    }
    Ok(())
}

/// Launch `command` and block until the child exits (reaping it).
///
/// Failures are returned to whoever joins the worker handle; the monitor
/// surfaces them in its logs.
pub(crate) async fn run(inner: Arc<RunnerInner>, command: String) -> RunnerResult<()> {
    debug!(runner = %inner.short_inspect(), "worker started");

    let mut child = {
        let _launch = launch_lock().lock().await;

        let pair = logs::open_pair(&inner.config.log_dir, &inner.name, inner.id)?;
        logs::retain(&pair)?;

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&command)
            .current_dir(&inner.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(pair.stdout))
            .stderr(Stdio::from(pair.stderr));
        inner.spec.configure_environment(&mut cmd);

        let child = cmd.spawn()?;
        if let Some(pid) = child.id() {
            inner.record_pid(Pid::from_raw(pid as i32));
        }
        child
    };

    let status = child.wait().await?;
    debug!(runner = %inner.short_inspect(), %status, "child exited");
    Ok(())
}
