//! Process-wide runner registry for bulk teardown
//!
//! Every runner registers itself on construction and stays registered for
//! the lifetime of the process. Entries are weak references, so a dropped
//! runner simply stops upgrading; the list is never pruned.

use std::sync::{Arc, Mutex, OnceLock, Weak};

use tracing::warn;

use crate::runner::{Runner, RunnerInner};

static INSTANCES: OnceLock<Mutex<Vec<Weak<RunnerInner>>>> = OnceLock::new();

fn instances() -> &'static Mutex<Vec<Weak<RunnerInner>>> {
    INSTANCES.get_or_init(|| Mutex::new(Vec::new()))
}

pub(crate) fn register(inner: &Arc<RunnerInner>) {
    instances()
        .lock()
        .expect("runner registry lock poisoned")
        .push(Arc::downgrade(inner));
}

/// Stop every registered runner that is currently running.
///
/// Intended as a suite-teardown sweep. A runner that cannot be stopped is
/// logged as a warning and skipped; one stuck process never blocks cleanup
/// of the rest. Stopping an already-stopped runner is a no-op, so sweeping
/// stale entries is harmless.
pub async fn stop_all() {
    let snapshot: Vec<Arc<RunnerInner>> = {
        let list = instances().lock().expect("runner registry lock poisoned");
        list.iter().filter_map(Weak::upgrade).collect()
    };

    for inner in snapshot {
        let runner = Runner::from_inner(inner);
        match runner.is_running() {
            Ok(true) => {
                if let Err(e) = runner.stop().await {
                    warn!(runner = %runner.short_inspect(), error = %e, "unable to stop runner during sweep");
                }
            }
            Ok(false) => {}
            Err(e) => {
                warn!(runner = %runner.short_inspect(), error = %e, "liveness probe failed during sweep");
            }
        }
    }
}
