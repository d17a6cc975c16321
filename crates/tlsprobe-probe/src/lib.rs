//! # tlsprobe-probe
//!
//! Driver scenarios for the counter library: each logical thread performs
//! the canonical read / inc / read / assign / read sequence against one
//! storage scope, with short fixed delays so interleavings show up in the
//! printed output. The binaries (`tls-probe`, `normal-probe`) are flagless;
//! their behavior is fixed at compile time.

pub mod scenario;

pub use scenario::{STEP_DELAY, WORKER_THREADS, run_single_thread, run_worker_threads};
