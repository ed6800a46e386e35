//! Per-instance log files and the process-wide open-handle list
//!
//! Every launched child gets a dedicated stdout/stderr file pair, opened in
//! append mode and named after the runner. Clones of the handles are
//! retained for the lifetime of the process so the harness can frame test
//! boundaries directly into every capture file; the core never closes them.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Open handles to every log file created in this process.
static LOG_FILES: OnceLock<Mutex<Vec<File>>> = OnceLock::new();

fn log_files() -> &'static Mutex<Vec<File>> {
    LOG_FILES.get_or_init(|| Mutex::new(Vec::new()))
}

/// The stdout/stderr capture files for one launched child.
pub(crate) struct LogFilePair {
    pub stdout: File,
    pub stderr: File,
}

/// Path of the stdout capture file for a runner instance.
pub fn stdout_path(log_dir: &Path, name: &str, id: u64) -> PathBuf {
    log_dir.join(format!("{name}-{id}.out.log"))
}

/// Path of the stderr capture file for a runner instance.
pub fn stderr_path(log_dir: &Path, name: &str, id: u64) -> PathBuf {
    log_dir.join(format!("{name}-{id}.err.log"))
}

/// Open the capture pair for a runner instance, creating the log directory
/// as needed. Files are opened append-mode so repeated launches accumulate.
pub(crate) fn open_pair(log_dir: &Path, name: &str, id: u64) -> io::Result<LogFilePair> {
    fs::create_dir_all(log_dir)?;
    let open = |path: PathBuf| OpenOptions::new().create(true).append(true).open(path);
    Ok(LogFilePair {
        stdout: open(stdout_path(log_dir, name, id))?,
        stderr: open(stderr_path(log_dir, name, id))?,
    })
}

/// Retain clones of both handles in the process-wide list.
pub(crate) fn retain(pair: &LogFilePair) -> io::Result<()> {
    let mut files = log_files().lock().expect("log handle list lock poisoned");
    files.push(pair.stdout.try_clone()?);
    files.push(pair.stderr.try_clone()?);
    Ok(())
}

/// Append a timestamped framing line to every retained log file.
///
/// Harnesses call this around each test so captured child output can be
/// attributed to the test that produced it.
pub fn append_marker(text: &str) -> io::Result<()> {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let mut files = log_files().lock().expect("log handle list lock poisoned");
    for file in files.iter_mut() {
        writeln!(file, "command-runner [{timestamp}] -- {text}")?;
    }
    Ok(())
}
