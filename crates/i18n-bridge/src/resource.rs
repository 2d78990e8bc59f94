//! Ownership of the native engine handle
//!
//! A [`NativeResource`] is created once, shared by every call of a session,
//! and freed at most once. Freeing is gated on the in-flight counter: the
//! native free never runs while a [`CallGuard`] is alive.
//!
//! State machine: `Valid` on successful create, `Valid -> Freed` on dispose
//! (after in-flight calls drain). `Freed` is terminal.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::guard::CallGuard;
use crate::symbols::{CreateFn, FreeFn, RawHandle};

/// Owner of a single opaque engine handle.
///
/// The `closed` flag and the in-flight counter are paired with `SeqCst`
/// ordering on both sides: a guard increments then re-checks `closed`, and
/// `free` sets `closed` then reads the counter, so at least one side always
/// observes the other.
pub struct NativeResource {
    handle: NonNull<c_void>,
    release: FreeFn,
    closed: AtomicBool,
    in_flight: AtomicUsize,
    drain_lock: Mutex<()>,
    drained: Condvar,
}

// SAFETY: the handle is an opaque token that is never dereferenced on this
// side; it is only passed back to the engine. Concurrency inside the engine is
// the engine's contract. All coordination state here is atomic or locked.
unsafe impl Send for NativeResource {}
unsafe impl Sync for NativeResource {}

impl NativeResource {
    /// Acquire a new engine handle.
    ///
    /// A null handle or the all-ones sentinel is rejected with
    /// [`Error::InitializationFailed`]; `release` is never called for it.
    pub fn create(create: CreateFn, release: FreeFn) -> Result<Self> {
        let raw = unsafe { create() };
        let handle = NonNull::new(raw)
            .filter(|ptr| ptr.as_ptr() as usize != usize::MAX)
            .ok_or_else(|| Error::InitializationFailed {
                reason: format!("engine returned invalid handle {:p}", raw),
            })?;

        debug!(handle = ?handle, "Engine handle created");
        Ok(Self {
            handle,
            release,
            closed: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            drain_lock: Mutex::new(()),
            drained: Condvar::new(),
        })
    }

    /// Whether new calls may still be issued on this handle
    pub fn is_valid(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    /// Number of boundary calls currently executing
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Open a guarded call on this handle
    pub fn acquire(&self) -> Result<CallGuard<'_>> {
        CallGuard::enter(self)
    }

    /// Run `f` with the raw handle while a guard holds the resource alive.
    ///
    /// The guard is released on every exit path of `f`, including panics.
    pub fn with_call<R>(&self, f: impl FnOnce(RawHandle) -> Result<R>) -> Result<R> {
        let guard = self.acquire()?;
        f(guard.handle())
    }

    /// Release the native handle.
    ///
    /// Idempotent: only the first call has any effect. New calls are refused
    /// immediately; the native free waits until in-flight calls have drained.
    pub fn free(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            trace!("Engine handle already freed");
            return;
        }

        self.wait_for_drain();

        // SAFETY: `closed` was set by this call only, and no guard is in
        // flight, so no other call can use the handle again.
        unsafe { (self.release)(self.handle.as_ptr()) };
        debug!(handle = ?self.handle, "Engine handle freed");
    }

    fn wait_for_drain(&self) {
        let mut lock = self
            .drain_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            debug!(
                in_flight = self.in_flight.load(Ordering::SeqCst),
                "Waiting for in-flight engine calls before free"
            );
            lock = self
                .drained
                .wait(lock)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn raw(&self) -> RawHandle {
        self.handle.as_ptr()
    }

    pub(crate) fn enter(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn leave(&self) {
        let previous = self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 && self.closed.load(Ordering::SeqCst) {
            let _lock = self
                .drain_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.drained.notify_all();
        }
    }
}

impl Drop for NativeResource {
    fn drop(&mut self) {
        self.free();
    }
}

impl std::fmt::Debug for NativeResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeResource")
            .field("handle", &self.handle)
            .field("valid", &self.is_valid())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
