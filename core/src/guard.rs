//! Scoped cancellation handle shared by timers and visibility observations.

use std::fmt;

/// Releases a scheduled timer or observation when dropped.
///
/// The handle is acquired together with the resource it guards and the
/// release runs unconditionally on drop, whether the owner finished
/// normally or was torn down early.
#[must_use = "dropping the guard cancels what it guards"]
pub struct CancelGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl CancelGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release now instead of at drop.
    pub fn cancel(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for CancelGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::CancelGuard;

    #[test]
    fn releases_on_drop_once() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let guard = CancelGuard::new(move || c.set(c.get() + 1));
        drop(guard);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn explicit_cancel_does_not_release_twice() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        CancelGuard::new(move || c.set(c.get() + 1)).cancel();
        assert_eq!(count.get(), 1);
    }
}
