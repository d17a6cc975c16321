//! Probe report generation.

use serde::{Deserialize, Serialize};
use tlsprobe_core::{Observation, StorageScope};

/// Verdict for one thread's trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// Worker thread id; absent for the single-threaded variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<u64>,
    /// The observations that make up the trace.
    pub trace: Vec<Observation>,
    pub passed: bool,
    /// Checker message when the trace violated the storage-scope contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Machine-readable result of one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Schema version.
    pub version: String,
    /// Storage scope exercised, when known (subprocess captures of the
    /// process-scoped probe and the thread-scoped probe verify identically,
    /// so `run` reports omit it).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<StorageScope>,
    /// How the probe ran: `in-process` or the spawned executable path.
    pub source: String,
    /// Per-trace verdicts.
    pub traces: Vec<TraceResult>,
    /// SHA-256 of the raw captured stdout, for subprocess runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_sha256: Option<String>,
}

impl ProbeReport {
    /// True when every trace passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.traces.iter().all(|t| t.passed)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlsprobe_core::Step;

    fn passing_trace(thread: Option<u64>) -> TraceResult {
        TraceResult {
            thread,
            trace: Step::ALL
                .iter()
                .map(|&step| Observation {
                    thread,
                    step,
                    direct: step.expected_value(),
                    via_lib: step.expected_value(),
                })
                .collect(),
            passed: true,
            error: None,
        }
    }

    #[test]
    fn report_roundtrips_through_json() {
        let report = ProbeReport {
            version: "v1".to_string(),
            scope: Some(StorageScope::Thread),
            source: "in-process".to_string(),
            traces: vec![passing_trace(None), passing_trace(Some(3))],
            capture_sha256: None,
        };
        let json = report.to_json().unwrap();
        let restored = ProbeReport::from_json(&json).unwrap();
        assert_eq!(restored.scope, Some(StorageScope::Thread));
        assert_eq!(restored.traces.len(), 2);
        assert!(restored.passed());
    }

    #[test]
    fn report_fails_when_any_trace_fails() {
        let mut failing = passing_trace(Some(1));
        failing.passed = false;
        failing.error = Some("leak".to_string());
        let report = ProbeReport {
            version: "v1".to_string(),
            scope: None,
            source: "probe".to_string(),
            traces: vec![passing_trace(None), failing],
            capture_sha256: Some("00".repeat(32)),
        };
        assert!(!report.passed());
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let report = ProbeReport {
            version: "v1".to_string(),
            scope: None,
            source: "in-process".to_string(),
            traces: vec![passing_trace(None)],
            capture_sha256: None,
        };
        let json = report.to_json().unwrap();
        assert!(!json.contains("capture_sha256"));
        assert!(!json.contains("\"scope\""));
        assert!(!json.contains("\"error\""));
    }
}
