//! Collection mutators for collections kept in comparer order.
//!
//! `ids` always lists entities in non-decreasing comparer order. Added
//! entities go after existing ones with an equal sort key; an updated entity
//! goes before them.
//!
//! - Single inserts binary-search their slot.
//! - Batches collect their new keys, sort them once and merge them into
//!   the existing sequence in one linear pass.
//! - An updated entity that still fits between its neighbors stays where it
//!   is, so the `ids` allocation survives updates that do not move anything.
//!   One that no longer fits is re-inserted ahead of its equals.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use super::draft::Draft;
use super::models::{Changes, EntityState, Update};
use super::operations::{index_entities, StateOperations};
use super::policy::{Policy, SortComparer};

pub struct SortedStateAdapter<K, T> {
    policy: Policy<K, T>,
    compare: SortComparer<T>,
}

/// A draft plus the keys inserted during the current operation that have
/// not been given a slot in `ids` yet.
struct Batch<K, T> {
    draft: Draft<K, T>,
    pending: Vec<K>,
}

impl<K, T> SortedStateAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    pub fn new(policy: Policy<K, T>, compare: SortComparer<T>) -> Self {
        Self { policy, compare }
    }

    fn begin(&self, state: EntityState<K, T>) -> Batch<K, T> {
        Batch {
            draft: Draft::new(state),
            pending: Vec::new(),
        }
    }

    /// Give every pending key its slot and rebuild the state.
    fn finish(&self, batch: Batch<K, T>) -> EntityState<K, T> {
        let Batch { mut draft, mut pending } = batch;

        if pending.len() == 1 {
            if let Some(id) = pending.pop() {
                let at = match draft.get(&id) {
                    Some(entity) => self.insertion_index(draft.ids(), draft.entities(), entity),
                    None => draft.ids().len(),
                };
                draft.ids_mut().insert(at, id);
            }
        } else if !pending.is_empty() {
            pending.sort_by(|a, b| self.compare_keys(draft.entities(), a, b));
            let merged = self.merge(draft.ids(), &pending, draft.entities());
            draft.replace_ids(merged);
        }

        draft.finish()
    }

    fn compare_keys(&self, entities: &HashMap<K, T>, a: &K, b: &K) -> Ordering {
        match (entities.get(a), entities.get(b)) {
            (Some(a), Some(b)) => (self.compare)(a, b),
            _ => Ordering::Equal,
        }
    }

    /// First index whose entity sorts strictly after `entity`.
    fn insertion_index(&self, ids: &[K], entities: &HashMap<K, T>, entity: &T) -> usize {
        ids.partition_point(|id| {
            entities
                .get(id)
                .map_or(true, |existing| (self.compare)(existing, entity) != Ordering::Greater)
        })
    }

    /// First index whose entity does not sort strictly before `entity`.
    fn update_index(&self, ids: &[K], entities: &HashMap<K, T>, entity: &T) -> usize {
        ids.partition_point(|id| {
            entities
                .get(id)
                .map_or(true, |existing| (self.compare)(existing, entity) == Ordering::Less)
        })
    }

    /// Whether an updated `entity` belongs at slot `index`: strictly after
    /// its predecessor, not after its successor.
    fn fits_at(&self, ids: &[K], entities: &HashMap<K, T>, index: usize, entity: &T) -> bool {
        let neighbor = |i: usize| ids.get(i).and_then(|id| entities.get(id));

        let after_prev = index
            .checked_sub(1)
            .and_then(neighbor)
            .map_or(true, |prev| (self.compare)(prev, entity) == Ordering::Less);
        let before_next = neighbor(index + 1)
            .map_or(true, |next| (self.compare)(entity, next) != Ordering::Greater);

        after_prev && before_next
    }

    /// Stable linear merge of two sorted key lists; `existing` wins ties.
    fn merge(&self, existing: &[K], incoming: &[K], entities: &HashMap<K, T>) -> Vec<K> {
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        let (mut i, mut j) = (0, 0);

        while i < existing.len() && j < incoming.len() {
            if self.compare_keys(entities, &existing[i], &incoming[j]) != Ordering::Greater {
                merged.push(existing[i].clone());
                i += 1;
            } else {
                merged.push(incoming[j].clone());
                j += 1;
            }
        }
        merged.extend_from_slice(&existing[i..]);
        merged.extend_from_slice(&incoming[j..]);
        merged
    }

    fn insert(&self, batch: &mut Batch<K, T>, entity: T) {
        let id = self.policy.select_id(&entity);
        if batch.draft.contains(&id) {
            return;
        }
        batch.draft.entities_mut().insert(id.clone(), entity);
        batch.pending.push(id);
    }

    fn set(&self, batch: &mut Batch<K, T>, entity: T) {
        let id = self.policy.select_id(&entity);
        match batch.draft.get(&id) {
            None => self.insert(batch, entity),
            Some(existing) if *existing == entity => {}
            Some(_) => self.replace(batch, &id.clone(), id, entity),
        }
    }

    fn update<C: Changes<T>>(&self, batch: &mut Batch<K, T>, id: &K, changes: &C) {
        let Some(existing) = batch.draft.get(id) else {
            return;
        };
        let updated = changes.apply(existing);
        let new_id = self.policy.select_id(&updated);

        if new_id == *id && *existing == updated {
            return;
        }
        self.replace(batch, id, new_id, updated);
    }

    /// Store `updated` under `new_id` in place of the entity at `old`,
    /// moving it only if it no longer fits between its neighbors.
    fn replace(&self, batch: &mut Batch<K, T>, old: &K, new_id: K, updated: T) {
        let rekeyed = new_id != *old;
        if rekeyed && batch.draft.contains(&new_id) {
            tracing::debug!("Id-changing update replaced an existing entity");
            self.evict(batch, &new_id);
        }

        if let Some(slot) = batch.pending.iter().position(|id| id == old) {
            // Not placed yet; its slot is decided when the batch finishes
            let entities = batch.draft.entities_mut();
            if rekeyed {
                entities.remove(old);
            }
            entities.insert(new_id.clone(), updated);
            batch.pending[slot] = new_id;
            return;
        }

        let Some(index) = batch.draft.position(old) else {
            return;
        };
        let in_place = self.fits_at(batch.draft.ids(), batch.draft.entities(), index, &updated);

        let entities = batch.draft.entities_mut();
        if rekeyed {
            entities.remove(old);
        }
        entities.insert(new_id.clone(), updated);

        if in_place {
            if rekeyed {
                batch.draft.ids_mut()[index] = new_id;
            }
            return;
        }

        batch.draft.ids_mut().remove(index);
        let at = match batch.draft.get(&new_id) {
            Some(entity) => self.update_index(batch.draft.ids(), batch.draft.entities(), entity),
            None => batch.draft.ids().len(),
        };
        batch.draft.ids_mut().insert(at, new_id);
    }

    fn evict(&self, batch: &mut Batch<K, T>, id: &K) {
        if let Some(slot) = batch.pending.iter().position(|pending| pending == id) {
            batch.pending.remove(slot);
            batch.draft.entities_mut().remove(id);
        } else {
            batch.draft.remove_many([id]);
        }
    }
}

impl<K, T> StateOperations<K, T> for SortedStateAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    fn add_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut batch = self.begin(state);
        for entity in entities {
            self.insert(&mut batch, entity);
        }
        self.finish(batch)
    }

    fn add_all<I>(&self, entities: I, _state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let (mut ids, entities) = index_entities(&self.policy, entities);
        ids.sort_by(|a, b| self.compare_keys(&entities, a, b));
        EntityState::from_indexed(ids, entities)
    }

    fn set_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut batch = self.begin(state);
        for entity in entities {
            self.set(&mut batch, entity);
        }
        self.finish(batch)
    }

    fn remove_many<'a, I>(&self, ids: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut draft = Draft::new(state);
        draft.remove_many(ids);
        draft.finish()
    }

    fn update_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>,
    {
        let mut batch = self.begin(state);
        for update in updates {
            self.update(&mut batch, &update.id, &update.changes);
        }
        self.finish(batch)
    }

    fn upsert_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>,
    {
        let mut batch = self.begin(state);
        for Update { id, changes } in updates {
            if batch.draft.contains(&id) {
                self.update(&mut batch, &id, &changes);
            } else if let Some(entity) = changes.into_entity() {
                self.insert(&mut batch, entity);
            }
        }
        self.finish(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Score {
        key: u32,
        points: i32,
    }

    fn score(key: u32, points: i32) -> Score {
        Score { key, points }
    }

    fn adapter() -> SortedStateAdapter<u32, Score> {
        SortedStateAdapter::new(
            Policy::new(|s: &Score| s.key),
            Arc::new(|a: &Score, b: &Score| a.points.cmp(&b.points)),
        )
    }

    #[test]
    fn add_one_binary_inserts_after_equal_keys() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20), score(3, 30)], EntityState::new());
        let state = adapter.add_one(score(4, 20), state);
        assert_eq!(state.ids(), &[1, 2, 4, 3]);
    }

    #[test]
    fn add_many_merges_sorted_batch() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 30)], EntityState::new());
        let state = adapter.add_many(vec![score(5, 40), score(3, 5), score(4, 10)], state);
        assert_eq!(state.ids(), &[3, 1, 4, 2, 5]);
    }

    #[test]
    fn add_all_is_stable_on_ties() {
        let state = adapter().add_all(
            vec![score(9, 1), score(3, 0), score(7, 1), score(1, 0)],
            EntityState::new(),
        );
        assert_eq!(state.ids(), &[3, 1, 9, 7]);
    }

    #[test]
    fn update_that_still_fits_keeps_ids_allocation() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20), score(3, 30)], EntityState::new());
        let before = state.clone();
        let state = adapter.update_one(Update::new(2, score(2, 25)), state);

        assert!(state.ids_ptr_eq(&before));
        assert_eq!(state.get(&2), Some(&score(2, 25)));
    }

    #[test]
    fn update_that_moves_reinserts() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20), score(3, 30)], EntityState::new());
        let state = adapter.update_one(Update::new(1, score(1, 35)), state);
        assert_eq!(state.ids(), &[2, 3, 1]);
    }

    #[test]
    fn update_onto_equal_key_moves_ahead_of_it() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20), score(3, 30)], EntityState::new());
        let state = adapter.update_one(Update::new(3, score(3, 20)), state);
        assert_eq!(state.ids(), &[1, 3, 2]);
    }

    #[test]
    fn update_equal_to_successor_stays_in_place() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20), score(3, 30)], EntityState::new());
        let before = state.clone();
        let state = adapter.update_one(Update::new(1, score(1, 20)), state);

        assert!(state.ids_ptr_eq(&before));
        assert_eq!(state.ids(), &[1, 2, 3]);
    }

    #[test]
    fn upsert_batch_can_patch_its_own_insert() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20)], EntityState::new());
        let state = adapter.upsert_many(
            vec![
                Update::new(3, score(3, 15)),
                Update::new(4, score(4, 50)),
                Update::new(3, score(3, 99)),
            ],
            state,
        );
        assert_eq!(state.ids(), &[1, 2, 4, 3]);
        assert_eq!(state.get(&3), Some(&score(3, 99)));
    }

    #[test]
    fn rekey_onto_pending_key_drops_the_pending_insert() {
        let adapter = adapter();
        let state = adapter.add_all(vec![score(1, 10), score(2, 20)], EntityState::new());
        let state = adapter.upsert_many(
            vec![Update::new(5, score(5, 1)), Update::new(2, score(5, 30)), Update::new(6, score(6, 0))],
            state,
        );
        assert_eq!(state.ids(), &[6, 1, 5]);
        assert_eq!(state.get(&5), Some(&score(5, 30)));
    }
}
