//! Child-process lifecycle management for test harnesses
//!
//! This library starts an externally supplied shell command in a background
//! worker, captures its stdout/stderr to per-instance log files, and
//! guarantees its termination on request — even under concurrent stop
//! calls. A process-wide registry lets a suite teardown sweep stop every
//! outstanding process at once.
//!
//! Each started runner is a pair of tasks coordinating through shared
//! state: a worker that owns spawning and reaping the child, and a monitor
//! that waits for a stop request, sends SIGTERM then SIGINT, and blocks
//! until the worker has confirmed exit.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use command_runner::{CommandSource, Runner, RunnerConfig};
//!
//! struct Server;
//!
//! impl CommandSource for Server {
//!     fn name(&self) -> &str {
//!         "server"
//!     }
//!     fn command(&self) -> String {
//!         "bin/server --port 3000".to_string()
//!     }
//! }
//!
//! # async fn example() -> command_runner::RunnerResult<()> {
//! let runner = Runner::new(Server, RunnerConfig::default().with_log_dir("log"));
//! runner.start().await?;
//! assert!(runner.is_running()?);
//! runner.stop().await?;
//!
//! // Suite teardown: stop everything still running.
//! command_runner::registry::stop_all().await;
//! # Ok(())
//! # }
//! ```
//!
//! Lifecycle transitions (starts, signal sends, joins) are emitted as
//! `tracing` debug events; enable them with the harness's subscriber and a
//! `RUST_LOG` filter.

pub mod config;
pub mod error;
pub mod logs;
pub mod registry;
pub mod traits;

mod monitor;
mod runner;
mod worker;

// Re-export commonly used types
pub use config::RunnerConfig;
pub use error::{RunnerError, RunnerResult};
pub use registry::stop_all;
pub use runner::Runner;
pub use traits::CommandSource;
