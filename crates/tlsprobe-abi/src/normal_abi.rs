//! Process-scoped counter: an ordinary exported global.
//!
//! `normal_var` is a plain data symbol. Every thread in the process reads
//! and writes the same cell, and nothing guards concurrent writers; the
//! contract leaves that behavior racy so the contrast with the
//! thread-scoped variant stays visible.

use std::ffi::c_int;

/// The process-scoped counter, exported so callers can bypass the accessors
/// with direct loads and stores.
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
pub static mut normal_var: c_int = 0;

/// Returns the current value of `normal_var`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_normal_var() -> c_int {
    // SAFETY: plain load from the exported global; unsynchronized access is
    // part of the contract for this counter.
    unsafe { *(&raw const normal_var) }
}

/// Adds `delta` to `normal_var`. No overflow checking, no return value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inc_normal(delta: c_int) {
    // SAFETY: same storage and same contract as `get_normal_var`.
    unsafe {
        let cell = &raw mut normal_var;
        *cell = (*cell).wrapping_add(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tlsprobe_core::{INC_DELTA, SET_LITERAL};

    // Tests share one process-wide cell; serialize them so assignments from
    // one test never appear in another.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn lock_and_reset() -> std::sync::MutexGuard<'static, ()> {
        let guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { *(&raw mut normal_var) = 0 };
        guard
    }

    #[test]
    fn canonical_sequence_single_thread() {
        let _g = lock_and_reset();
        unsafe {
            assert_eq!(get_normal_var(), 0);
            inc_normal(INC_DELTA);
            assert_eq!(*(&raw const normal_var), INC_DELTA);
            assert_eq!(get_normal_var(), INC_DELTA);
            *(&raw mut normal_var) = SET_LITERAL;
            assert_eq!(get_normal_var(), SET_LITERAL);
        }
    }

    #[test]
    fn write_visible_across_join_boundary() {
        let _g = lock_and_reset();
        // The writer finishes before the read; join provides the
        // happens-before edge, so this does not race.
        std::thread::spawn(|| unsafe { inc_normal(INC_DELTA) })
            .join()
            .expect("writer thread");
        unsafe {
            assert_eq!(get_normal_var(), INC_DELTA);
        }
    }

    #[test]
    fn inc_wraps_on_overflow() {
        let _g = lock_and_reset();
        unsafe {
            *(&raw mut normal_var) = c_int::MAX;
            inc_normal(1);
            assert_eq!(get_normal_var(), c_int::MIN);
        }
    }

    #[test]
    fn direct_store_and_accessor_read_same_cell() {
        let _g = lock_and_reset();
        unsafe {
            *(&raw mut normal_var) = 77;
            assert_eq!(get_normal_var(), 77);
        }
    }
}
