//! Process-scoped counter driver.
//!
//! Runs the canonical sequence on the main thread only. The threaded
//! variant (`run_worker_threads(StorageScope::Process, ..)`) is left for
//! manual experimentation: concurrent unsynchronized writes to the shared
//! counter are racy by design, so the default run keeps the output
//! deterministic. See the ignored `process_scope_workers_race_visibly`
//! test in the scenario module.

use tlsprobe_core::StorageScope;
use tlsprobe_probe::run_single_thread;

fn main() {
    run_single_thread(StorageScope::Process, true);
}
