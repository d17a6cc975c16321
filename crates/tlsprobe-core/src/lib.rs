//! # tlsprobe-core
//!
//! Model of the two counter storage scopes under test:
//!
//! - **Process scope**: one cell for the whole process, shared by every
//!   thread that touches it.
//! - **Thread scope**: one independently zero-initialized cell per thread,
//!   destroyed when the owning thread terminates.
//!
//! The crate defines the scope taxonomy, the observation/trace vocabulary
//! the probes print and the harness parses back, and the checker for the
//! storage-scope invariant. No `unsafe` code is permitted at the crate
//! level; the counters themselves live in `tlsprobe-abi`.

#![deny(unsafe_code)]

pub mod counter;
pub mod observation;
pub mod scope;
pub mod verify;

pub use counter::{INC_DELTA, SET_LITERAL};
pub use observation::{Observation, ObservationLine, ParseError, Step, assemble};
pub use scope::StorageScope;
pub use verify::{TraceError, verify_process_trace, verify_thread_traces, verify_trace};
