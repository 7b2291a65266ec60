//! Single-writer state container.
//!
//! The current snapshot lives in a `watch` channel: dispatches run the
//! reducer while holding the channel's write lock, so writers are
//! serialized, and subscribers only wake when the reducer produced a
//! different snapshot.

use tokio::sync::watch;

use super::reducer::Reducer;
use super::state::State;

pub struct Store<R: Reducer> {
    reducer: R,
    sender: watch::Sender<R::State>,
}

impl<R: Reducer> Store<R> {
    /// Create a store starting from the reducer's initial state.
    pub fn new(reducer: R) -> Self {
        let initial = reducer.initial_state();
        Self::with_state(reducer, initial)
    }

    /// Create a store starting from a supplied snapshot.
    pub fn with_state(reducer: R, state: R::State) -> Self {
        let (sender, _) = watch::channel(state);
        Self { reducer, sender }
    }

    /// Apply an action to the current state.
    ///
    /// Returns true if the reducer produced a new snapshot. Subscribers are
    /// notified only in that case.
    pub fn dispatch(&self, action: R::Action) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            let next = self.reducer.reduce(current.clone(), action);
            if next.is_same(current) {
                return false;
            }
            *current = next;
            true
        });

        tracing::trace!(changed, "Action dispatched");
        changed
    }

    /// Get the current snapshot.
    ///
    /// This is cheap because states share their data.
    pub fn state(&self) -> R::State {
        self.sender.borrow().clone()
    }

    /// Project the current snapshot through a selector.
    pub fn select<V>(&self, selector: impl FnOnce(&R::State) -> V) -> V {
        selector(&self.sender.borrow())
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver starts out seeing the current snapshot as already read.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }
}
