//! Entity adapter: one operation surface over either strategy.

use std::collections::HashMap;
use std::hash::Hash;

use super::action::EntityAction;
use super::invariants::{self, InvariantViolation};
use super::models::{Changes, EntityState, Update};
use super::operations::StateOperations;
use super::policy::Policy;
use super::sorted::SortedStateAdapter;
use super::unsorted::UnsortedStateAdapter;

enum Strategy<K, T> {
    Unsorted(UnsortedStateAdapter<K, T>),
    Sorted(SortedStateAdapter<K, T>),
}

/// Immutable-update operations and selectors for a normalized collection.
///
/// The strategy is picked once from the policy: with a sort comparer the
/// collection is kept sorted, otherwise it keeps append order. Callers only
/// see the difference in the resulting `ids` order.
///
/// # Example
///
/// ```
/// use entity_store::entity::{EntityAdapter, EntityState, Policy, StateOperations, Update};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Book {
///     id: String,
///     title: String,
/// }
///
/// let adapter = EntityAdapter::new(
///     Policy::new(|b: &Book| b.id.clone()).with_sort_comparer(|a, b| a.title.cmp(&b.title)),
/// );
///
/// let state = adapter.add_one(
///     Book { id: "af".into(), title: "Animal Farm".into() },
///     EntityState::new(),
/// );
/// let before = state.clone();
/// let state = adapter.update_one(
///     Update::new("missing".to_string(), Book { id: "x".into(), title: "X".into() }),
///     state,
/// );
/// assert!(state.ptr_eq(&before));
/// assert_eq!(adapter.select_total(&state), 1);
/// ```
pub struct EntityAdapter<K, T> {
    policy: Policy<K, T>,
    strategy: Strategy<K, T>,
}

impl<K, T> EntityAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    pub fn new(policy: Policy<K, T>) -> Self {
        let strategy = match policy.sort_comparer() {
            Some(compare) => {
                Strategy::Sorted(SortedStateAdapter::new(policy.clone(), compare.clone()))
            }
            None => Strategy::Unsorted(UnsortedStateAdapter::new(policy.clone())),
        };
        Self { policy, strategy }
    }

    pub fn policy(&self) -> &Policy<K, T> {
        &self.policy
    }

    pub fn is_sorted(&self) -> bool {
        matches!(self.strategy, Strategy::Sorted(_))
    }

    /// An empty collection.
    pub fn get_initial_state(&self) -> EntityState<K, T> {
        EntityState::new()
    }

    /// A collection holding `entities`, ordered per this adapter.
    pub fn initial_state_with<I>(&self, entities: I) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        self.add_all(entities, EntityState::new())
    }

    /// Route an action to the matching operation.
    pub fn apply<C>(&self, action: EntityAction<K, T, C>, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
    {
        match action {
            EntityAction::AddOne { entity } => self.add_one(entity, state),
            EntityAction::AddMany { entities } => self.add_many(entities, state),
            EntityAction::AddAll { entities } => self.add_all(entities, state),
            EntityAction::SetOne { entity } => self.set_one(entity, state),
            EntityAction::SetMany { entities } => self.set_many(entities, state),
            EntityAction::SetAll { entities } => self.set_all(entities, state),
            EntityAction::RemoveOne { id } => self.remove_one(&id, state),
            EntityAction::RemoveMany { ids } => self.remove_many(&ids, state),
            EntityAction::RemoveAll => self.remove_all(state),
            EntityAction::UpdateOne { update } => self.update_one(update, state),
            EntityAction::UpdateMany { updates } => self.update_many(updates, state),
            EntityAction::UpsertOne { update } => self.upsert_one(update, state),
            EntityAction::UpsertMany { updates } => self.upsert_many(updates, state),
        }
    }

    /// Entities in `ids` order.
    pub fn select_all<'s>(&self, state: &'s EntityState<K, T>) -> Vec<&'s T> {
        state.iter().collect()
    }

    pub fn select_ids<'s>(&self, state: &'s EntityState<K, T>) -> &'s [K] {
        state.ids()
    }

    pub fn select_entities<'s>(&self, state: &'s EntityState<K, T>) -> &'s HashMap<K, T> {
        state.entities()
    }

    pub fn select_total(&self, state: &EntityState<K, T>) -> usize {
        state.len()
    }

    /// Check every invariant this adapter maintains against `state`.
    pub fn check(&self, state: &EntityState<K, T>) -> Result<(), InvariantViolation> {
        invariants::check(&self.policy, state)
    }

    /// Debug builds re-check every result. A violation here means the id
    /// selector or comparer is not deterministic.
    fn verified(&self, state: EntityState<K, T>) -> EntityState<K, T> {
        if cfg!(debug_assertions) {
            if let Err(violation) = self.check(&state) {
                tracing::error!(%violation, "Entity adapter produced an invalid state");
            }
        }
        state
    }
}

impl<K, T> StateOperations<K, T> for EntityAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    fn add_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.add_many(entities, state),
            Strategy::Sorted(ops) => ops.add_many(entities, state),
        };
        self.verified(next)
    }

    fn add_all<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.add_all(entities, state),
            Strategy::Sorted(ops) => ops.add_all(entities, state),
        };
        self.verified(next)
    }

    fn set_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.set_many(entities, state),
            Strategy::Sorted(ops) => ops.set_many(entities, state),
        };
        self.verified(next)
    }

    fn remove_many<'a, I>(&self, ids: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.remove_many(ids, state),
            Strategy::Sorted(ops) => ops.remove_many(ids, state),
        };
        self.verified(next)
    }

    fn update_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.update_many(updates, state),
            Strategy::Sorted(ops) => ops.update_many(updates, state),
        };
        self.verified(next)
    }

    fn upsert_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>,
    {
        let next = match &self.strategy {
            Strategy::Unsorted(ops) => ops.upsert_many(updates, state),
            Strategy::Sorted(ops) => ops.upsert_many(updates, state),
        };
        self.verified(next)
    }
}
