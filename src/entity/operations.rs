//! The operation surface shared by the sorted and unsorted strategies.

use std::collections::HashMap;
use std::hash::Hash;
use std::iter;

use super::models::{Changes, EntityState, Update};
use super::policy::Policy;

/// Pure collection mutators.
///
/// Every operation consumes the previous state and returns the next one.
/// When nothing changes the input state comes back untouched, so
/// `next.ptr_eq(&previous)` holds for any clone the caller kept. When only
/// entity values change, the `ids` sequence is shared with the input.
pub trait StateOperations<K, T> {
    /// Add entities whose keys are not present yet, in input order.
    fn add_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>;

    /// Replace the whole collection.
    fn add_all<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>;

    /// Insert or fully replace each entity.
    fn set_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>;

    /// Remove every listed key that is present.
    fn remove_many<'a, I>(&self, ids: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a;

    /// Patch each listed entity in turn. Later updates see earlier ones.
    fn update_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>;

    /// Patch present entities and insert absent ones, in turn.
    fn upsert_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>;

    fn add_one(&self, entity: T, state: EntityState<K, T>) -> EntityState<K, T> {
        self.add_many(iter::once(entity), state)
    }

    fn set_one(&self, entity: T, state: EntityState<K, T>) -> EntityState<K, T> {
        self.set_many(iter::once(entity), state)
    }

    fn set_all<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        self.add_all(entities, state)
    }

    fn remove_one(&self, id: &K, state: EntityState<K, T>) -> EntityState<K, T> {
        self.remove_many(iter::once(id), state)
    }

    /// Always a fresh empty state, even when `state` is already empty.
    fn remove_all(&self, _state: EntityState<K, T>) -> EntityState<K, T> {
        EntityState::new()
    }

    fn update_one<C>(&self, update: Update<K, C>, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
    {
        self.update_many(iter::once(update), state)
    }

    fn upsert_one<C>(&self, update: Update<K, C>, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
    {
        self.upsert_many(iter::once(update), state)
    }
}

/// Key the given entities: ids in first-occurrence order, values last-wins.
pub(crate) fn index_entities<K, T, I>(policy: &Policy<K, T>, entities: I) -> (Vec<K>, HashMap<K, T>)
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let entities = entities.into_iter();
    let (lower, _) = entities.size_hint();
    let mut ids = Vec::with_capacity(lower);
    let mut map = HashMap::with_capacity(lower);

    for entity in entities {
        let id = policy.select_id(&entity);
        if map.insert(id.clone(), entity).is_none() {
            ids.push(id);
        }
    }

    (ids, map)
}
