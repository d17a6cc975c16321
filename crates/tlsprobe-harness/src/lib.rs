//! Verification harness for the tlsprobe demo.
//!
//! This crate provides:
//! - In-process scenario runs: drive a storage scope and verify every trace
//! - Capture verify: spawn a probe executable, parse its diagnostic output,
//!   and check the storage-scope invariant per thread
//! - Report generation: machine-readable JSON probe reports with a SHA-256
//!   fingerprint of the raw capture
//! - `asm-hex`: wrap assembly text with a fixed directive header, run it
//!   through an external assembler, and print the flat code bytes as hex

#![forbid(unsafe_code)]

pub mod asm_hex;
pub mod report;
pub mod runner;
pub mod structured_log;

pub use report::{ProbeReport, TraceResult};
pub use runner::{Capture, HarnessError, run_in_process, run_probe, verify_capture};
