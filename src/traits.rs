//! Capability trait supplied by the harness type that owns a command
//!
//! A type that knows what command to run implements [`CommandSource`] and
//! composes with a [`Runner`](crate::Runner) value holding the lifecycle
//! state, instead of having lifecycle behavior injected into its own
//! namespace.

use tokio::process::Command;

/// Supplies the command a [`Runner`](crate::Runner) manages.
pub trait CommandSource: Send + Sync {
    /// Short name used in log file names and diagnostics.
    fn name(&self) -> &str;

    /// The single shell command to run.
    ///
    /// Must not chain commands with `&&` or `;`; `start` rejects such
    /// strings before any process is spawned.
    fn command(&self) -> String;

    /// Optional hook to prepare the child's environment.
    ///
    /// Invoked inside the launch critical section, before the process is
    /// spawned. The default does nothing.
    fn configure_environment(&self, command: &mut Command) {
        let _ = command;
    }
}
