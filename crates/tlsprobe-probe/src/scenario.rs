//! Probe scenarios.
//!
//! A scenario drives one storage scope through the canonical sequence:
//!
//! 1. read (direct, then through the accessor, then through an indirect
//!    function-pointer call)
//! 2. `inc(11)` through the library function
//! 3. read again
//! 4. assign the literal `13` by direct variable access
//! 5. read again
//!
//! Between steps the thread sleeps for [`STEP_DELAY`], purely to make
//! interleavings observable in the printed output, never for correctness.

use parking_lot::Mutex;
use std::cell::Cell;
use std::ffi::c_int;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use tlsprobe_core::{INC_DELTA, Observation, SET_LITERAL, Step, StorageScope};

/// Worker count for the multi-threaded variant. Fixed by the demo contract.
pub const WORKER_THREADS: usize = 5;

/// Fixed delay between steps, for interleaving visibility only.
pub const STEP_DELAY: Duration = Duration::from_micros(100);

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static WORKER_ID: Cell<u64> = const { Cell::new(0) };
}

/// Keeps the two diagnostic lines of one step adjacent in the output.
static PRINT_LOCK: Mutex<()> = Mutex::new(());

fn current_worker_id() -> u64 {
    WORKER_ID.with(|slot| {
        let existing = slot.get();
        if existing != 0 {
            return existing;
        }
        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        slot.set(id);
        id
    })
}

/// The three access paths into one counter scope.
///
/// Plain `fn` pointers so worker threads can carry the table across the
/// spawn boundary without borrowing anything.
#[derive(Clone, Copy)]
struct CounterApi {
    read_direct: fn() -> i32,
    read_lib: fn() -> i32,
    /// Accessor reached through an indirect `extern "C"` pointer, the way a
    /// caller that resolved the symbol at run time would call it.
    read_indirect: fn() -> i32,
    inc_lib: fn(i32),
    write_direct: fn(i32),
}

fn process_api() -> CounterApi {
    use tlsprobe_abi::normal_abi;

    fn read_direct() -> i32 {
        // SAFETY: plain load from the exported global; unsynchronized by
        // the counter's contract.
        unsafe { *(&raw const normal_abi::normal_var) }
    }
    fn read_lib() -> i32 {
        unsafe { normal_abi::get_normal_var() }
    }
    fn read_indirect() -> i32 {
        let get: unsafe extern "C" fn() -> c_int = normal_abi::get_normal_var;
        unsafe { get() }
    }
    fn inc_lib(delta: i32) {
        unsafe { normal_abi::inc_normal(delta) }
    }
    fn write_direct(value: i32) {
        // SAFETY: direct assignment is the contract being demonstrated.
        unsafe { *(&raw mut normal_abi::normal_var) = value }
    }

    CounterApi {
        read_direct,
        read_lib,
        read_indirect,
        inc_lib,
        write_direct,
    }
}

fn thread_api() -> CounterApi {
    use tlsprobe_abi::tls_abi;

    fn read_direct() -> i32 {
        // SAFETY: the pointer addresses the calling thread's own cell.
        unsafe { *tls_abi::tls_var_addr() }
    }
    fn read_lib() -> i32 {
        tls_abi::get_tls_var()
    }
    fn read_indirect() -> i32 {
        let get: extern "C" fn() -> c_int = tls_abi::get_tls_var;
        get()
    }
    fn inc_lib(delta: i32) {
        tls_abi::inc_tls(delta)
    }
    fn write_direct(value: i32) {
        // SAFETY: same single-thread ownership as `read_direct`.
        unsafe { *tls_abi::tls_var_addr() = value }
    }

    CounterApi {
        read_direct,
        read_lib,
        read_indirect,
        inc_lib,
        write_direct,
    }
}

fn scope_api(scope: StorageScope) -> CounterApi {
    match scope {
        StorageScope::Process => process_api(),
        StorageScope::Thread => thread_api(),
    }
}

fn observe(api: &CounterApi, thread: Option<u64>, step: Step, echo: bool) -> Observation {
    // The initial read goes through the indirect function-pointer path, the
    // later ones through the direct call; both must observe the same cell.
    let read_accessor = match step {
        Step::Init => api.read_indirect,
        Step::AfterInc | Step::AfterSet => api.read_lib,
    };
    let observation = Observation {
        thread,
        step,
        direct: (api.read_direct)(),
        via_lib: read_accessor(),
    };
    if echo {
        let _guard = PRINT_LOCK.lock();
        for line in observation.lines() {
            println!("{line}");
        }
    }
    observation
}

fn run_sequence(api: CounterApi, thread: Option<u64>, echo: bool) -> Vec<Observation> {
    let mut trace = Vec::with_capacity(Step::ALL.len());

    trace.push(observe(&api, thread, Step::Init, echo));
    thread::sleep(STEP_DELAY);

    (api.inc_lib)(INC_DELTA);
    trace.push(observe(&api, thread, Step::AfterInc, echo));
    thread::sleep(STEP_DELAY);

    (api.write_direct)(SET_LITERAL);
    trace.push(observe(&api, thread, Step::AfterSet, echo));
    thread::sleep(STEP_DELAY);

    trace
}

/// Single-threaded variant: the main (calling) thread runs the sequence
/// once. Printed lines carry no thread id.
pub fn run_single_thread(scope: StorageScope, echo: bool) -> Vec<Observation> {
    run_sequence(scope_api(scope), None, echo)
}

/// Multi-threaded variant: [`WORKER_THREADS`] workers run the sequence
/// concurrently, then are joined. Returns one trace per worker in join
/// order. A worker that panicked contributes no trace; the demo ignores
/// thread failures by contract.
pub fn run_worker_threads(scope: StorageScope, echo: bool) -> Vec<(Option<u64>, Vec<Observation>)> {
    let handles: Vec<_> = (0..WORKER_THREADS)
        .map(|_| {
            thread::spawn(move || {
                let tid = current_worker_id();
                let trace = run_sequence(scope_api(scope), Some(tid), echo);
                (Some(tid), trace)
            })
        })
        .collect();

    let mut traces = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(entry) = handle.join() {
            traces.push(entry);
        }
    }
    traces
}
