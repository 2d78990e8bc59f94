//! Process-global observation and control hooks for tests
//!
//! Counters are shared by every engine instance in the process, so tests
//! that read them must not run concurrently with other engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

static CREATED: AtomicUsize = AtomicUsize::new(0);
static FREED: AtomicUsize = AtomicUsize::new(0);
static CALLS: AtomicUsize = AtomicUsize::new(0);

/// Snapshot of the global counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Handles handed out by `i18n_new`
    pub created: usize,
    /// Handles released by `i18n_free`
    pub freed: usize,
    /// Handle-taking calls other than create and free
    pub calls: usize,
}

/// Read the global counters
pub fn stats() -> Stats {
    Stats {
        created: CREATED.load(Ordering::SeqCst),
        freed: FREED.load(Ordering::SeqCst),
        calls: CALLS.load(Ordering::SeqCst),
    }
}

/// Zero the global counters
pub fn reset_stats() {
    CREATED.store(0, Ordering::SeqCst);
    FREED.store(0, Ordering::SeqCst);
    CALLS.store(0, Ordering::SeqCst);
}

pub(crate) fn record_create() {
    CREATED.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn record_free() {
    FREED.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn record_call() {
    CALLS.fetch_add(1, Ordering::SeqCst);
}

struct GateState {
    closed: bool,
    waiting: usize,
}

static GATE: Mutex<GateState> = Mutex::new(GateState {
    closed: false,
    waiting: 0,
});
static GATE_CHANGED: Condvar = Condvar::new();

/// Make `__hold__` translations block until [`release_gate`]
pub fn hold_gate() {
    GATE.lock().unwrap_or_else(PoisonError::into_inner).closed = true;
    GATE_CHANGED.notify_all();
}

/// Let blocked and future `__hold__` translations through
pub fn release_gate() {
    GATE.lock().unwrap_or_else(PoisonError::into_inner).closed = false;
    GATE_CHANGED.notify_all();
}

/// Block until at least `count` calls are parked at the gate
pub fn wait_for_held(count: usize) {
    let mut state = GATE.lock().unwrap_or_else(PoisonError::into_inner);
    while state.waiting < count {
        state = GATE_CHANGED
            .wait(state)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

pub(crate) fn pass_gate() {
    let mut state = GATE.lock().unwrap_or_else(PoisonError::into_inner);
    if !state.closed {
        return;
    }
    state.waiting += 1;
    GATE_CHANGED.notify_all();
    while state.closed {
        state = GATE_CHANGED
            .wait(state)
            .unwrap_or_else(PoisonError::into_inner);
    }
    state.waiting -= 1;
    GATE_CHANGED.notify_all();
}
