//! Collection mutators for append-ordered collections.

use std::hash::Hash;

use super::draft::Draft;
use super::models::{Changes, EntityState, Update};
use super::operations::{index_entities, StateOperations};
use super::policy::Policy;

/// Operations for a collection without a sort comparer.
///
/// New keys go to the end of `ids`; an id-changing update keeps the slot of
/// the key it replaces.
pub struct UnsortedStateAdapter<K, T> {
    policy: Policy<K, T>,
}

impl<K, T> UnsortedStateAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    pub fn new(policy: Policy<K, T>) -> Self {
        Self { policy }
    }

    fn insert(&self, draft: &mut Draft<K, T>, id: K, entity: T) {
        if draft.contains(&id) {
            return;
        }
        draft.entities_mut().insert(id.clone(), entity);
        draft.ids_mut().push(id);
    }

    fn set(&self, draft: &mut Draft<K, T>, entity: T) {
        let id = self.policy.select_id(&entity);
        match draft.get(&id) {
            None => self.insert(draft, id, entity),
            Some(existing) if *existing == entity => {}
            Some(_) => {
                draft.entities_mut().insert(id, entity);
            }
        }
    }

    fn update<C: Changes<T>>(&self, draft: &mut Draft<K, T>, id: &K, changes: &C) {
        let Some(existing) = draft.get(id) else {
            return;
        };
        let updated = changes.apply(existing);
        let new_id = self.policy.select_id(&updated);

        if new_id != *id {
            self.rekey(draft, id, new_id, updated);
        } else if *existing != updated {
            draft.entities_mut().insert(new_id, updated);
        }
    }

    /// Store `updated` under `new_id` in the slot `old` occupied.
    fn rekey(&self, draft: &mut Draft<K, T>, old: &K, new_id: K, updated: T) {
        let Some(index) = draft.position(old) else {
            return;
        };
        let collision = draft.position(&new_id);

        let entities = draft.entities_mut();
        entities.remove(old);
        entities.insert(new_id.clone(), updated);

        let ids = draft.ids_mut();
        ids[index] = new_id;
        if let Some(other) = collision {
            tracing::debug!(
                position = index,
                overwritten = other,
                "Id-changing update replaced an existing entity"
            );
            ids.remove(other);
        }
    }
}

impl<K, T> StateOperations<K, T> for UnsortedStateAdapter<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + PartialEq,
{
    fn add_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut draft = Draft::new(state);
        for entity in entities {
            let id = self.policy.select_id(&entity);
            self.insert(&mut draft, id, entity);
        }
        draft.finish()
    }

    fn add_all<I>(&self, entities: I, _state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let (ids, entities) = index_entities(&self.policy, entities);
        EntityState::from_indexed(ids, entities)
    }

    fn set_many<I>(&self, entities: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut draft = Draft::new(state);
        for entity in entities {
            self.set(&mut draft, entity);
        }
        draft.finish()
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
        let mut draft = Draft::new(state);
        for update in updates {
            self.update(&mut draft, &update.id, &update.changes);
        }
        draft.finish()
    }

    fn upsert_many<C, I>(&self, updates: I, state: EntityState<K, T>) -> EntityState<K, T>
    where
        C: Changes<T>,
        I: IntoIterator<Item = Update<K, C>>,
    {
        let mut draft = Draft::new(state);
        for Update { id, changes } in updates {
            if draft.contains(&id) {
                self.update(&mut draft, &id, &changes);
            } else if let Some(entity) = changes.into_entity() {
                let key = self.policy.select_id(&entity);
                self.insert(&mut draft, key, entity);
            }
        }
        draft.finish()
    }
}
