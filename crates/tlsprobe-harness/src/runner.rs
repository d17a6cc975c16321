//! Probe execution engine.
//!
//! Two ways to exercise a scope: run the scenario in-process through
//! `tlsprobe-probe`, or spawn a probe executable and verify the diagnostic
//! text it printed. Both paths end at the same checker in `tlsprobe-core`.

use std::path::Path;
use std::process::Command;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tlsprobe_core::{Observation, ParseError, StorageScope, assemble, verify_trace};
use tlsprobe_probe::{WORKER_THREADS, run_single_thread, run_worker_threads};

use crate::report::{ProbeReport, TraceResult};

/// Report schema version.
const REPORT_VERSION: &str = "v1";

/// Failure to run or interpret a probe.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to spawn probe '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe '{path}' exited with status {status}")]
    ProbeFailed { path: String, status: String },

    #[error("probe printed non-UTF-8 output")]
    BadEncoding,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Raw captured output of a spawned probe.
#[derive(Debug, Clone)]
pub struct Capture {
    pub stdout: String,
    /// Hex SHA-256 of the raw bytes, recorded in the report so a capture
    /// can be tied back to the run that produced it.
    pub sha256: String,
}

fn trace_result(thread: Option<u64>, trace: Vec<Observation>) -> TraceResult {
    let verdict = verify_trace(&trace);
    TraceResult {
        thread,
        trace,
        passed: verdict.is_ok(),
        error: verdict.err().map(|e| e.to_string()),
    }
}

/// Run a scenario in-process and verify every trace.
///
/// `threaded` selects the five-worker variant; the single-threaded variant
/// runs otherwise. Verification is identical for both scopes: only a
/// thread's own writes may appear in its trace.
#[must_use]
pub fn run_in_process(scope: StorageScope, threaded: bool) -> ProbeReport {
    let traces = if threaded {
        run_worker_threads(scope, false)
    } else {
        vec![(None, run_single_thread(scope, false))]
    };

    let mut results: Vec<TraceResult> = traces
        .into_iter()
        .map(|(thread, trace)| trace_result(thread, trace))
        .collect();

    if threaded && results.len() != WORKER_THREADS {
        // A missing worker is a failed run even if the survivors passed.
        results.push(TraceResult {
            thread: None,
            trace: Vec::new(),
            passed: false,
            error: Some(format!(
                "expected {WORKER_THREADS} worker traces, found {}",
                results.len()
            )),
        });
    }

    ProbeReport {
        version: REPORT_VERSION.to_string(),
        scope: Some(scope),
        source: "in-process".to_string(),
        traces: results,
        capture_sha256: None,
    }
}

/// Spawn a probe executable and capture its stdout.
pub fn run_probe(path: &Path) -> Result<Capture, HarnessError> {
    let display = path.display().to_string();
    let output = Command::new(path).output().map_err(|source| HarnessError::Spawn {
        path: display.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(HarnessError::ProbeFailed {
            path: display,
            status: output.status.to_string(),
        });
    }

    let sha256 = hex::encode(Sha256::digest(&output.stdout));
    let stdout = String::from_utf8(output.stdout).map_err(|_| HarnessError::BadEncoding)?;
    Ok(Capture { stdout, sha256 })
}

/// Parse captured probe output and verify every assembled trace.
pub fn verify_capture(capture: &Capture, source: &str) -> Result<ProbeReport, HarnessError> {
    let lines: Vec<&str> = capture.stdout.lines().collect();
    let traces = assemble(&lines)?;

    let results = traces
        .into_iter()
        .map(|(thread, trace)| trace_result(thread, trace))
        .collect();

    Ok(ProbeReport {
        version: REPORT_VERSION.to_string(),
        scope: None,
        source: source.to_string(),
        traces: results,
        capture_sha256: Some(capture.sha256.clone()),
    })
}
