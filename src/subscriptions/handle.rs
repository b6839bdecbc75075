//! # Subscription handles.
//!
//! A [`SubscriptionHandle`] is an opaque teardown capability: whatever a
//! dependent component needs to undo when its subscription ends (detach from
//! a channel, drop a sink, ...). The teardown runs **at most once**, whether
//! triggered manually via [`SubscriptionHandle::unsubscribe`] or by the
//! fiber's registry on stop.
//!
//! Handles compare and hash by identity: clones are the same handle, two
//! handles built from identical closures are not.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type Teardown = Box<dyn FnOnce() + Send + 'static>;

struct Inner {
    id: u64,
    teardown: Mutex<Option<Teardown>>,
}

/// Identity-unique teardown capability.
#[derive(Clone)]
pub struct SubscriptionHandle {
    inner: Arc<Inner>,
}

impl SubscriptionHandle {
    /// Wraps a teardown closure.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                teardown: Mutex::new(Some(Box::new(teardown))),
            }),
        }
    }

    /// Process-unique identity of this handle.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Runs the teardown if it has not run yet.
    ///
    /// Returns `true` if this call ran it. The closure runs outside the
    /// handle's lock, so it may freely touch other handles.
    pub fn unsubscribe(&self) -> bool {
        let teardown = self.inner.teardown.lock().take();
        match teardown {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    /// True once the teardown has been claimed.
    pub fn is_disposed(&self) -> bool {
        self.inner.teardown.lock().is_none()
    }
}

impl PartialEq for SubscriptionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for SubscriptionHandle {}

impl Hash for SubscriptionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.inner.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn teardown_runs_once() {
        let n = Arc::new(AtomicUsize::new(0));
        let c = n.clone();
        let h = SubscriptionHandle::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let clone = h.clone();

        assert!(h.unsubscribe());
        assert!(!clone.unsubscribe());
        assert!(clone.is_disposed());
        assert_eq!(n.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn identity_equality() {
        let a = SubscriptionHandle::new(|| {});
        let b = SubscriptionHandle::new(|| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }
}
