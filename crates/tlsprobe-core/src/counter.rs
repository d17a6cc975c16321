//! Constants of the canonical counter sequence.
//!
//! The counters themselves live in `tlsprobe-abi`; this module only pins
//! the two mutation values every scenario and checker agrees on.

/// Delta applied by the canonical increment step.
pub const INC_DELTA: i32 = 11;

/// Literal stored by the canonical direct-assignment step.
pub const SET_LITERAL: i32 = 13;
