//! Thread-scoped counter: one zero-initialized cell per thread.
//!
//! Stable Rust cannot export a `__thread` data symbol from a `cdylib`, so
//! direct variable access goes through `tls_var_addr`, which hands the
//! caller a raw pointer into its own thread's cell. Loads and stores
//! through that pointer bypass the accessor functions while observing the
//! same storage-scope rules, which is the contract the demo needs.

use std::cell::UnsafeCell;
use std::ffi::c_int;

thread_local! {
    static TLS_VAR: UnsafeCell<c_int> = const { UnsafeCell::new(0) };
}

/// Address of the calling thread's counter cell.
///
/// The pointer is only meaningful on the thread that obtained it and only
/// while that thread is alive; the cell is destroyed when the thread
/// terminates.
#[unsafe(no_mangle)]
pub extern "C" fn tls_var_addr() -> *mut c_int {
    TLS_VAR.with(UnsafeCell::get)
}

/// Returns the current value of the calling thread's cell.
#[unsafe(no_mangle)]
pub extern "C" fn get_tls_var() -> c_int {
    // SAFETY: the cell belongs to the calling thread; no other thread can
    // address it.
    TLS_VAR.with(|cell| unsafe { *cell.get() })
}

/// Adds `delta` to the calling thread's cell. No overflow checking.
#[unsafe(no_mangle)]
pub extern "C" fn inc_tls(delta: c_int) {
    // SAFETY: same single-thread ownership as `get_tls_var`.
    TLS_VAR.with(|cell| unsafe {
        let ptr = cell.get();
        *ptr = (*ptr).wrapping_add(delta);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tlsprobe_core::{INC_DELTA, SET_LITERAL};

    // Each #[test] runs on its own thread, so every test starts from a
    // fresh zero cell without any locking.

    #[test]
    fn canonical_sequence_single_thread() {
        let ptr = tls_var_addr();
        unsafe {
            assert_eq!(*ptr, 0);
            assert_eq!(get_tls_var(), 0);
            inc_tls(INC_DELTA);
            assert_eq!(*ptr, INC_DELTA);
            assert_eq!(get_tls_var(), INC_DELTA);
            *ptr = SET_LITERAL;
            assert_eq!(get_tls_var(), SET_LITERAL);
        }
    }

    #[test]
    fn write_never_observed_by_other_thread() {
        inc_tls(INC_DELTA);
        let observed = thread::spawn(|| get_tls_var()).join().expect("reader");
        assert_eq!(observed, 0, "thread-scoped write leaked across threads");
        assert_eq!(get_tls_var(), INC_DELTA);
    }

    #[test]
    fn five_workers_each_get_a_fresh_cell() {
        unsafe { *tls_var_addr() = SET_LITERAL };
        let handles: Vec<_> = (0..5)
            .map(|_| {
                thread::spawn(|| {
                    assert_eq!(get_tls_var(), 0);
                    inc_tls(INC_DELTA);
                    get_tls_var()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("worker"), INC_DELTA);
        }
        assert_eq!(get_tls_var(), SET_LITERAL);
    }

    #[test]
    fn addr_is_stable_within_a_thread() {
        assert_eq!(tls_var_addr(), tls_var_addr());
    }

    #[test]
    fn indirect_call_reaches_the_same_cell() {
        // Function-pointer calls must observe the same storage scope as
        // direct calls.
        let get: extern "C" fn() -> c_int = get_tls_var;
        let inc: extern "C" fn(c_int) = inc_tls;
        assert_eq!(get(), 0);
        inc(INC_DELTA);
        assert_eq!(get_tls_var(), INC_DELTA);
    }
}
