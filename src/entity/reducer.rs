//! Reducer routing entity actions through an adapter.

use std::hash::Hash;
use std::marker::PhantomData;

use super::action::EntityAction;
use super::adapter::EntityAdapter;
use super::models::{Changes, EntityState};
use crate::store::Reducer;

/// Reducer for a single normalized collection.
///
/// Pure function: every action maps to exactly one adapter operation.
pub struct EntityReducer<K, T, C> {
    adapter: EntityAdapter<K, T>,
    initial: EntityState<K, T>,
    _changes: PhantomData<fn() -> C>,
}

impl<K, T, C> EntityReducer<K, T, C>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    /// Reducer whose initial state is the empty collection.
    pub fn new(adapter: EntityAdapter<K, T>) -> Self {
        let initial = adapter.get_initial_state();
        Self::with_initial_state(adapter, initial)
    }

    /// Reducer whose initial state is `initial`.
    pub fn with_initial_state(adapter: EntityAdapter<K, T>, initial: EntityState<K, T>) -> Self {
        Self {
            adapter,
            initial,
            _changes: PhantomData,
        }
    }

    pub fn adapter(&self) -> &EntityAdapter<K, T> {
        &self.adapter
    }
}

impl<K, T, C> Reducer for EntityReducer<K, T, C>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
    C: Changes<T> + Send + 'static,
{
    type State = EntityState<K, T>;
    type Action = EntityAction<K, T, C>;

    fn initial_state(&self) -> Self::State {
        self.initial.clone()
    }

    fn reduce(&self, state: Self::State, action: Self::Action) -> Self::State {
        tracing::trace!(action = action.kind(), total = state.len(), "Reducing entity action");
        self.adapter.apply(action, state)
    }
}
