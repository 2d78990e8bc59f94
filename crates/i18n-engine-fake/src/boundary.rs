//! Panic containment for exported functions
//!
//! No panic may unwind into the caller; every export runs its body through
//! [`guarded`] and reports a panic as an ordinary failure code.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Failure code returned for panics and invalid input
pub const FAILURE: i32 = -1;

/// Run `f`, turning a panic into `fallback`
pub fn guarded<R>(fallback: R, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            eprintln!("i18n-engine-fake: panic at boundary: {}", panic_message(&payload));
            fallback
        }
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
