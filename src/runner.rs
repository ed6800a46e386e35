//! Runner façade over one supervised child process
//!
//! A [`Runner`] owns the shared state that the worker task (spawn + reap)
//! and the monitor task (stop signal + escalation) coordinate through. The
//! public surface is `start`, `stop`, and `is_running`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use nix::errno::Errno;
use nix::sys::signal;
use nix::unistd::Pid;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::RunnerConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::traits::CommandSource;
use crate::{logs, monitor, registry, worker};

/// Instance numbering for log file names and diagnostics.
static NEXT_RUNNER_ID: AtomicU64 = AtomicU64::new(1);

/// State shared between the façade, the worker task, and the monitor task.
pub(crate) struct RunnerInner {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) spec: Arc<dyn CommandSource>,
    pub(crate) config: RunnerConfig,
    /// Stop flag. The monitor waits on the receiving side; `stop` flips it
    /// to true, `start` resets it to false.
    pub(crate) stop_tx: watch::Sender<bool>,
    /// Recorded child pid, set once per launch.
    pid: StdMutex<Option<Pid>>,
    /// Worker task handle; present while a launch cycle is outstanding.
    pub(crate) worker: Mutex<Option<JoinHandle<RunnerResult<()>>>>,
    /// Monitor task handle; present while a launch cycle is outstanding.
    monitor: Mutex<Option<JoinHandle<RunnerResult<()>>>>,
}

impl RunnerInner {
    pub(crate) fn pid(&self) -> Option<Pid> {
        *self.pid.lock().expect("pid lock poisoned")
    }

    pub(crate) fn record_pid(&self, pid: Pid) {
        *self.pid.lock().expect("pid lock poisoned") = Some(pid);
    }

    fn clear_pid(&self) {
        *self.pid.lock().expect("pid lock poisoned") = None;
    }

    /// Diagnostic string identifying the instance and its pid.
    pub(crate) fn short_inspect(&self) -> String {
        match self.pid() {
            Some(pid) => format!("{}-{} (pid {})", self.name, self.id, pid),
            None => format!("{}-{} (pid none)", self.name, self.id),
        }
    }
}

/// Supervises one child process: start it, watch it, guarantee it stops.
#[derive(Clone)]
pub struct Runner {
    inner: Arc<RunnerInner>,
}

impl Runner {
    /// Create a runner for `spec` and register it for bulk teardown.
    ///
    /// Registration happens here, once; the runner is ready to `start`
    /// immediately.
    pub fn new(spec: impl CommandSource + 'static, config: RunnerConfig) -> Self {
        let (stop_tx, _stop_rx) = watch::channel(false);
        let inner = Arc::new(RunnerInner {
            id: NEXT_RUNNER_ID.fetch_add(1, Ordering::Relaxed),
            name: spec.name().to_string(),
            spec: Arc::new(spec),
            config,
            stop_tx,
            pid: StdMutex::new(None),
            worker: Mutex::new(None),
            monitor: Mutex::new(None),
        });
        registry::register(&inner);
        Runner { inner }
    }

    pub(crate) fn from_inner(inner: Arc<RunnerInner>) -> Self {
        Runner { inner }
    }

    /// Launch the command in a background worker task and start the monitor
    /// that supervises it.
    ///
    /// The command is validated before anything is spawned; a chained
    /// command fails here with [`RunnerError::InvalidCommand`] and no
    /// process ever exists. Calling `start` while a cycle is already
    /// outstanding reuses the existing worker and monitor.
    pub async fn start(&self) -> RunnerResult<()> {
        let command = self.inner.spec.command();
        worker::validate(&command)?;

        self.inner.stop_tx.send_replace(false);

        {
            let mut slot = self.inner.worker.lock().await;
            if slot.is_none() {
                self.inner.clear_pid();
                debug!(runner = %self.short_inspect(), command = %command, "starting worker");
                *slot = Some(tokio::spawn(worker::run(self.inner.clone(), command)));
            }
        }
        {
            let mut slot = self.inner.monitor.lock().await;
            if slot.is_none() {
                debug!(runner = %self.short_inspect(), "starting monitor");
                let stop_rx = self.inner.stop_tx.subscribe();
                *slot = Some(tokio::spawn(monitor::run(self.inner.clone(), stop_rx)));
            }
        }
        Ok(())
    }

    /// Stop the child with SIGTERM and SIGINT and wait until it has been
    /// reaped.
    ///
    /// Postcondition: either the child is gone, both task handles are
    /// cleared, and the pid is forgotten, or an error is raised —
    /// [`RunnerError::StillRunning`] when the process survived the signals,
    /// or a propagated signal-delivery failure. A raising `stop` leaves the
    /// worker handle in place so a retry can finish the teardown. Stopping
    /// a runner that was never started is a no-op.
    pub async fn stop(&self) -> RunnerResult<()> {
        debug!(runner = %self.short_inspect(), "stop requested");
        self.inner.stop_tx.send_replace(true);

        // Hold the slot lock across the join so concurrent stop calls
        // serialize instead of racing the liveness re-check below.
        {
            let mut slot = self.inner.monitor.lock().await;
            if let Some(handle) = slot.take() {
                match handle.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => return Err(e),
                    Err(e) => {
                        error!(runner = %self.short_inspect(), error = %e, "monitor task failed")
                    }
                }
            }
        }

        if self.is_running()? {
            return Err(RunnerError::StillRunning {
                runner: self.short_inspect(),
            });
        }

        // The monitor normally drains the worker slot, but it exits without
        // doing so when signal delivery fails. The child is gone at this
        // point, so the worker finishes immediately; join it here so a
        // successful stop never leaves a handle behind.
        {
            let mut slot = self.inner.worker.lock().await;
            if let Some(handle) = slot.take() {
                match handle.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!(runner = %self.short_inspect(), error = %e, "worker failed")
                    }
                    Err(e) => {
                        error!(runner = %self.short_inspect(), error = %e, "worker task failed")
                    }
                }
            }
        }

        debug!(runner = %self.short_inspect(), "stopped");
        self.inner.clear_pid();
        Ok(())
    }

    /// Whether the recorded pid currently refers to a live OS process.
    ///
    /// Probed with a zero-effect signal; a missing process is "not
    /// running", any other errno propagates.
    pub fn is_running(&self) -> RunnerResult<bool> {
        let Some(pid) = self.inner.pid() else {
            return Ok(false);
        };
        match signal::kill(pid, None) {
            Ok(()) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(source) => Err(RunnerError::Signal {
                pid: pid.as_raw(),
                source,
            }),
        }
    }

    /// Unique instance id, part of the log file names.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Recorded child pid, if a launch has progressed far enough to have one.
    pub fn pid(&self) -> Option<u32> {
        self.inner.pid().map(|pid| pid.as_raw() as u32)
    }

    /// Path of this runner's stdout capture file.
    pub fn stdout_log_path(&self) -> PathBuf {
        logs::stdout_path(&self.inner.config.log_dir, &self.inner.name, self.inner.id)
    }

    /// Path of this runner's stderr capture file.
    pub fn stderr_log_path(&self) -> PathBuf {
        logs::stderr_path(&self.inner.config.log_dir, &self.inner.name, self.inner.id)
    }

    /// Diagnostic string identifying the instance and its pid.
    pub fn short_inspect(&self) -> String {
        self.inner.short_inspect()
    }
}
