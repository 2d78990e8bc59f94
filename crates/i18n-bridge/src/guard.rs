//! Scoped liveness guard for boundary calls
//!
//! Every boundary call runs while a [`CallGuard`] is alive. Entering checks
//! liveness, bumps the in-flight counter and re-checks, so a concurrent
//! `free` either refuses the call or waits for it. Dropping the guard always
//! decrements the counter.

use tracing::trace;

use crate::error::{Error, Result};
use crate::resource::NativeResource;
use crate::symbols::RawHandle;

/// An open boundary call on a [`NativeResource`]
#[must_use = "the handle is only protected while the guard is alive"]
pub struct CallGuard<'a> {
    resource: &'a NativeResource,
}

impl<'a> CallGuard<'a> {
    pub(crate) fn enter(resource: &'a NativeResource) -> Result<Self> {
        if !resource.is_valid() {
            return Err(Error::ResourceDisposed);
        }

        resource.enter();
        // From here on, dropping the guard rolls the increment back.
        let guard = Self { resource };

        if !resource.is_valid() {
            trace!("Engine freed while entering call, rolling back");
            return Err(Error::ResourceDisposed);
        }

        Ok(guard)
    }

    /// The raw handle, valid for as long as this guard lives
    pub fn handle(&self) -> RawHandle {
        self.resource.raw()
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.resource.leave();
    }
}
