//! # tlsprobe-abi
//!
//! The shared-library boundary of the demo: a `cdylib` exporting one counter
//! per storage scope through `extern "C"` symbols.
//!
//! ```text
//! process scope:  normal_var (data symbol), get_normal_var, inc_normal
//! thread scope:   tls_var_addr, get_tls_var, inc_tls
//! ```
//!
//! There is deliberately no synchronization on either counter. The
//! process-scoped variant is racy under concurrent writers; that is the
//! exhibit, not an oversight. The thread-scoped variant needs none: each
//! thread owns its cell outright.

#![allow(clippy::missing_safety_doc)]

pub mod normal_abi;
pub mod tls_abi;

pub use normal_abi::{get_normal_var, inc_normal};
pub use tls_abi::{get_tls_var, inc_tls, tls_var_addr};
