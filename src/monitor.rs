//! Monitor task: wait for a stop request and escalate to OS signals
//!
//! One monitor runs per `start`..`stop` cycle. It blocks on the stop
//! channel, and on a stop request sends SIGTERM immediately followed by
//! SIGINT to the recorded pid, then waits until the worker has reaped the
//! child. There is no path back to waiting after the stop transition.

use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::error::{RunnerError, RunnerResult};
use crate::runner::RunnerInner;

pub(crate) async fn run(
    inner: Arc<RunnerInner>,
    mut stop_rx: watch::Receiver<bool>,
) -> RunnerResult<()> {
    debug!(runner = %inner.short_inspect(), "monitor started");

    loop {
        if *stop_rx.borrow_and_update() {
            break;
        }
        if stop_rx.changed().await.is_err() {
            // Runner dropped without a stop request; nothing left to do.
            debug!(runner = %inner.short_inspect(), "stop channel closed, monitor exiting");
            return Ok(());
        }
    }

    if let Some(pid) = inner.pid() {
        send_signal(&inner, pid, Signal::SIGTERM)?;
        send_signal(&inner, pid, Signal::SIGINT)?;
    }

    let worker = inner.worker.lock().await.take();
    if let Some(handle) = worker {
        debug!(runner = %inner.short_inspect(), "waiting for worker");
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(runner = %inner.short_inspect(), error = %e, "worker failed"),
            Err(e) => error!(runner = %inner.short_inspect(), error = %e, "worker task panicked"),
        }
        debug!(runner = %inner.short_inspect(), "worker joined");
    }
    Ok(())
}

/// Best-effort signal send: an already-exited process is not an error.
fn send_signal(inner: &RunnerInner, pid: Pid, sig: Signal) -> RunnerResult<()> {
    debug!(runner = %inner.short_inspect(), signal = %sig, "sending signal");
    match signal::kill(pid, sig) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(source) => Err(RunnerError::Signal {
            pid: pid.as_raw(),
            source,
        }),
    }
}
