//! Thread-scoped counter driver.
//!
//! Runs the canonical sequence on the main thread, then again on five
//! worker threads. Every worker starts from a fresh zero cell no matter
//! what the main thread did first; that is the behavior on display.

use tlsprobe_core::StorageScope;
use tlsprobe_probe::{run_single_thread, run_worker_threads};

fn main() {
    run_single_thread(StorageScope::Thread, true);
    run_worker_threads(StorageScope::Thread, true);
}
