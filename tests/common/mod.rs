//! Shared helpers for the integration test binaries

#![allow(dead_code)]

use std::time::{Duration, Instant};

use command_runner::{CommandSource, Runner};

/// A plain shell command for tests.
pub struct ShellCommand {
    pub name: &'static str,
    pub command: String,
}

impl ShellCommand {
    pub fn new(name: &'static str, command: impl Into<String>) -> Self {
        Self {
            name,
            command: command.into(),
        }
    }
}

impl CommandSource for ShellCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn command(&self) -> String {
        self.command.clone()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_for<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Wait until the runner's child is observably alive.
pub async fn wait_until_running(runner: &Runner) {
    let up = wait_for(Duration::from_secs(5), || runner.is_running().unwrap()).await;
    assert!(up, "runner never reported running: {}", runner.short_inspect());
}

/// Wait until the runner has a pid recorded and the child has exited on its
/// own.
pub async fn wait_until_exited(runner: &Runner) {
    let launched = wait_for(Duration::from_secs(5), || runner.pid().is_some()).await;
    assert!(launched, "runner never recorded a pid: {}", runner.short_inspect());
    let down = wait_for(Duration::from_secs(5), || !runner.is_running().unwrap()).await;
    assert!(down, "runner never exited: {}", runner.short_inspect());
}
