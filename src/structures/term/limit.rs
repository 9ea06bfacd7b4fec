use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A shared cancellation flag.
///
/// Clones of a limit share the flag, and so a check may be canceled from another thread by a clone of the limit of a term manager.
///
/// ```rust
/// # use otter_inc::structures::term::ResourceLimit;
/// let limit = ResourceLimit::default();
/// let remote = limit.clone();
///
/// remote.cancel();
/// assert!(limit.is_canceled());
///
/// limit.reset();
/// assert!(!remote.is_canceled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ResourceLimit {
    canceled: Arc<AtomicBool>,
}

impl ResourceLimit {
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.canceled.store(false, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Relaxed)
    }
}
