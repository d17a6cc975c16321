//! Storage-scope invariant checker.
//!
//! The property under test, per scope:
//!
//! - **Thread scope**: for all threads T1 != T2, a write by T1 is never
//!   observed by a subsequent read in T2. Every thread's local trace is
//!   therefore exactly `0 -> 11 -> 13`, with direct and accessor reads in
//!   agreement at each step.
//! - **Process scope**: a single-threaded run follows the same three-step
//!   sequence. Cross-thread visibility is only asserted where a join
//!   boundary guarantees it; a free-running multi-threaded process-scope
//!   trace is racy by design and is not checked here.

use crate::observation::{Observation, Step};
use thiserror::Error;

/// A trace that violates the storage-scope contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("trace has {found} observations, expected {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("observation {index} is step '{found}', expected '{expected}'")]
    StepOutOfOrder {
        index: usize,
        expected: Step,
        found: Step,
    },

    #[error(
        "thread {thread:?} observed {found} at step '{step}' ({access}), expected {expected}: \
         a foreign write leaked into this trace"
    )]
    UnexpectedValue {
        thread: Option<u64>,
        step: Step,
        /// `"direct"` or `"from lib"`.
        access: &'static str,
        expected: i32,
        found: i32,
    },

    #[error(
        "direct access and accessor disagree at step '{step}': direct={direct}, lib={via_lib}"
    )]
    AccessorDisagreement {
        step: Step,
        direct: i32,
        via_lib: i32,
    },

    #[error("expected {expected} worker traces, found {found}")]
    ThreadCountMismatch { expected: usize, found: usize },

    #[error("worker trace is missing a thread id")]
    MissingThreadId,
}

/// Check one thread's local trace against the canonical `0 -> 11 -> 13`
/// sequence. This is the contract for any thread-scoped trace and for a
/// single-threaded run against either scope.
pub fn verify_trace(trace: &[Observation]) -> Result<(), TraceError> {
    if trace.len() != Step::ALL.len() {
        return Err(TraceError::WrongLength {
            expected: Step::ALL.len(),
            found: trace.len(),
        });
    }

    for (index, (observation, step)) in trace.iter().zip(Step::ALL).enumerate() {
        if observation.step != step {
            return Err(TraceError::StepOutOfOrder {
                index,
                expected: step,
                found: observation.step,
            });
        }
        if observation.direct != observation.via_lib {
            return Err(TraceError::AccessorDisagreement {
                step,
                direct: observation.direct,
                via_lib: observation.via_lib,
            });
        }
        let expected = step.expected_value();
        if observation.direct != expected {
            return Err(TraceError::UnexpectedValue {
                thread: observation.thread,
                step,
                access: "direct",
                expected,
                found: observation.direct,
            });
        }
    }
    Ok(())
}

/// Check a multi-threaded thread-scope run: exactly `expected_threads`
/// worker traces, each carrying a thread id and each canonical.
pub fn verify_thread_traces(
    traces: &[(Option<u64>, Vec<Observation>)],
    expected_threads: usize,
) -> Result<(), TraceError> {
    if traces.len() != expected_threads {
        return Err(TraceError::ThreadCountMismatch {
            expected: expected_threads,
            found: traces.len(),
        });
    }
    for (thread, trace) in traces {
        if thread.is_none() && expected_threads > 1 {
            return Err(TraceError::MissingThreadId);
        }
        verify_trace(trace)?;
    }
    Ok(())
}

/// Check a single-threaded process-scope run. The sequence is the same as
/// the thread-scope one because only the main thread ever writes.
pub fn verify_process_trace(trace: &[Observation]) -> Result<(), TraceError> {
    verify_trace(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{INC_DELTA, SET_LITERAL};

    fn canonical(thread: Option<u64>) -> Vec<Observation> {
        Step::ALL
            .iter()
            .map(|&step| Observation {
                thread,
                step,
                direct: step.expected_value(),
                via_lib: step.expected_value(),
            })
            .collect()
    }

    #[test]
    fn canonical_trace_passes() {
        assert_eq!(verify_trace(&canonical(None)), Ok(()));
        assert_eq!(verify_trace(&canonical(Some(9))), Ok(()));
    }

    #[test]
    fn short_trace_is_rejected() {
        let mut trace = canonical(None);
        trace.pop();
        assert_eq!(
            verify_trace(&trace),
            Err(TraceError::WrongLength {
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn leaked_foreign_write_is_rejected() {
        // Another thread's `13` showing up at init is exactly the failure
        // the thread-scope invariant exists to catch.
        let mut trace = canonical(Some(1));
        trace[0].direct = SET_LITERAL;
        trace[0].via_lib = SET_LITERAL;
        assert_eq!(
            verify_trace(&trace),
            Err(TraceError::UnexpectedValue {
                thread: Some(1),
                step: Step::Init,
                access: "direct",
                expected: 0,
                found: SET_LITERAL,
            })
        );
    }

    #[test]
    fn accessor_disagreement_is_rejected() {
        let mut trace = canonical(None);
        trace[1].via_lib = 0;
        assert_eq!(
            verify_trace(&trace),
            Err(TraceError::AccessorDisagreement {
                step: Step::AfterInc,
                direct: INC_DELTA,
                via_lib: 0,
            })
        );
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut trace = canonical(None);
        trace.swap(0, 1);
        assert!(matches!(
            verify_trace(&trace),
            Err(TraceError::StepOutOfOrder { index: 0, .. })
        ));
    }

    #[test]
    fn thread_run_requires_exact_worker_count() {
        let traces: Vec<_> = (0..5).map(|tid| (Some(tid), canonical(Some(tid)))).collect();
        assert_eq!(verify_thread_traces(&traces, 5), Ok(()));
        assert_eq!(
            verify_thread_traces(&traces, 4),
            Err(TraceError::ThreadCountMismatch {
                expected: 4,
                found: 5,
            })
        );
    }

    #[test]
    fn thread_run_requires_thread_ids() {
        let traces = vec![(None, canonical(None)), (Some(2), canonical(Some(2)))];
        assert_eq!(
            verify_thread_traces(&traces, 2),
            Err(TraceError::MissingThreadId)
        );
    }

    #[test]
    fn single_worker_run_may_omit_thread_id() {
        let traces = vec![(None, canonical(None))];
        assert_eq!(verify_thread_traces(&traces, 1), Ok(()));
    }
}
