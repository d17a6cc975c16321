//! Observation vocabulary shared by the probes and the harness.
//!
//! A probe prints two diagnostic lines per step: one for the direct
//! variable access, one for the accessor-function read:
//!
//! ```text
//! 140168 >> after inc: 11
//! 140168 >> after inc (from lib): 11
//! ```
//!
//! Single-threaded runs omit the `<tid> >> ` prefix. The harness parses the
//! lines back into [`Observation`]s and feeds them to the checker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the canonical read/inc/read/set/read sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Initial read, before any mutation.
    Init,
    /// Read after the delta-11 increment through the library function.
    AfterInc,
    /// Read after the direct assignment of the literal 13.
    AfterSet,
}

impl Step {
    /// Steps in canonical order.
    pub const ALL: [Step; 3] = [Step::Init, Step::AfterInc, Step::AfterSet];

    /// Label used in the printed diagnostic line.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Step::Init => "init",
            Step::AfterInc => "after inc",
            Step::AfterSet => "after set",
        }
    }

    /// Value a thread must observe at this step when only its own writes are
    /// visible (the thread-scope invariant, and any single-threaded run).
    #[must_use]
    pub fn expected_value(self) -> i32 {
        match self {
            Step::Init => 0,
            Step::AfterInc => crate::counter::INC_DELTA,
            Step::AfterSet => crate::counter::SET_LITERAL,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "init" => Some(Step::Init),
            "after inc" => Some(Step::AfterInc),
            "after set" => Some(Step::AfterSet),
            _ => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLine {
    /// Worker thread id, absent in single-threaded output.
    pub thread: Option<u64>,
    pub step: Step,
    /// True for the `(from lib)` accessor read, false for direct access.
    pub from_lib: bool,
    pub value: i32,
}

impl std::fmt::Display for ObservationLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(tid) = self.thread {
            write!(f, "{tid} >> ")?;
        }
        if self.from_lib {
            write!(f, "{} (from lib): {}", self.step, self.value)
        } else {
            write!(f, "{}: {}", self.step, self.value)
        }
    }
}

/// Failure to interpret probe output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed diagnostic line: '{0}'")]
    MalformedLine(String),
    #[error("unknown step label: '{0}'")]
    UnknownStep(String),
    #[error("unpaired line (direct read without accessor read): '{0}'")]
    UnpairedLine(String),
    #[error("accessor read for step '{expected}' paired with '{found}'")]
    MismatchedPair { expected: Step, found: Step },
}

impl std::str::FromStr for ObservationLine {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::MalformedLine(s.to_string());

        let (thread, rest) = match s.split_once(" >> ") {
            Some((tid, rest)) => {
                let tid = tid.trim().parse::<u64>().map_err(|_| malformed())?;
                (Some(tid), rest)
            }
            None => (None, s),
        };

        let (label, value) = rest.rsplit_once(": ").ok_or_else(malformed)?;
        let value = value.trim().parse::<i32>().map_err(|_| malformed())?;

        let (label, from_lib) = match label.strip_suffix(" (from lib)") {
            Some(bare) => (bare, true),
            None => (label, false),
        };
        let step =
            Step::from_label(label).ok_or_else(|| ParseError::UnknownStep(label.to_string()))?;

        Ok(ObservationLine {
            thread,
            step,
            from_lib,
            value,
        })
    }
}

/// One completed step: the direct read and the accessor read it pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Worker thread id, absent for the single-threaded variant.
    pub thread: Option<u64>,
    pub step: Step,
    /// Value seen by direct variable access.
    pub direct: i32,
    /// Value returned by the library accessor.
    pub via_lib: i32,
}

impl Observation {
    /// Render as the two diagnostic lines the probes print.
    #[must_use]
    pub fn lines(&self) -> [ObservationLine; 2] {
        [
            ObservationLine {
                thread: self.thread,
                step: self.step,
                from_lib: false,
                value: self.direct,
            },
            ObservationLine {
                thread: self.thread,
                step: self.step,
                from_lib: true,
                value: self.via_lib,
            },
        ]
    }
}

/// Assemble raw probe output into per-thread observation traces.
///
/// Lines from different workers may interleave freely, but within one thread
/// the direct read always directly precedes its accessor read. Returns traces
/// keyed in first-appearance order; single-threaded output yields one trace
/// under `None`.
pub fn assemble(lines: &[&str]) -> Result<Vec<(Option<u64>, Vec<Observation>)>, ParseError> {
    let mut traces: Vec<(Option<u64>, Vec<Observation>)> = Vec::new();
    let mut pending: Vec<(Option<u64>, ObservationLine)> = Vec::new();

    for raw in lines {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let line: ObservationLine = raw.parse()?;

        if !line.from_lib {
            if let Some(idx) = pending.iter().position(|(tid, _)| *tid == line.thread) {
                let (_, stale) = pending.remove(idx);
                return Err(ParseError::UnpairedLine(stale.to_string()));
            }
            pending.push((line.thread, line));
            continue;
        }

        let idx = pending
            .iter()
            .position(|(tid, _)| *tid == line.thread)
            .ok_or_else(|| ParseError::UnpairedLine(raw.to_string()))?;
        let (_, direct) = pending.remove(idx);
        if direct.step != line.step {
            return Err(ParseError::MismatchedPair {
                expected: direct.step,
                found: line.step,
            });
        }

        let observation = Observation {
            thread: line.thread,
            step: line.step,
            direct: direct.value,
            via_lib: line.value,
        };
        match traces.iter_mut().find(|(tid, _)| *tid == line.thread) {
            Some((_, trace)) => trace.push(observation),
            None => traces.push((line.thread, vec![observation])),
        }
    }

    if let Some((_, stale)) = pending.pop() {
        return Err(ParseError::UnpairedLine(stale.to_string()));
    }
    Ok(traces)
}
