//! "Styled content changed" notification.
//!
//! Notifications carry no payload; a consumer re-reads the styled lines it
//! displays. Two ways to listen: a callback, or a single-slot channel that
//! coalesces notifications the receiver has not consumed yet.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by [`Observers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    callbacks: Vec<(ObserverId, Callback)>,
    watchers: Vec<SyncSender<()>>,
}

/// Observer list. Call order between observers is unspecified.
#[derive(Default)]
pub struct Observers {
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Observers")
            .field("callbacks", &inner.callbacks.len())
            .field("watchers", &inner.watchers.len())
            .finish()
    }
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback run on every notification.
    pub fn subscribe<F>(&self, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback; `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = inner.callbacks.len();
        inner.callbacks.retain(|(existing, _)| *existing != id);
        inner.callbacks.len() != before
    }

    /// Channel receiving at most one pending notification.
    ///
    /// Dropping the receiver unregisters it on the next notification.
    pub fn watch(&self) -> Receiver<()> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watchers
            .push(tx);
        rx
    }

    /// Notify every callback and watcher.
    ///
    /// Callbacks run after the observer list is unlocked, so they may
    /// subscribe or unsubscribe; such changes apply from the next notification.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner
                .watchers
                .retain(|tx| !matches!(tx.try_send(()), Err(TrySendError::Disconnected(()))));
            inner.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.callbacks.len() + inner.watchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
