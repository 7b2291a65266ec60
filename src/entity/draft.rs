//! Copy-on-write working copy of a collection.
//!
//! An operation takes the input state apart into a [`Draft`], edits it, and
//! puts it back together. The `ids` and `entities` halves are only cloned on
//! first write (`Arc::make_mut`), so a half nobody wrote to comes back as the
//! very same allocation.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use super::models::EntityState;

pub(crate) struct Draft<K, T> {
    ids: Arc<Vec<K>>,
    entities: Arc<HashMap<K, T>>,
}

impl<K, T> Draft<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    pub(crate) fn new(state: EntityState<K, T>) -> Self {
        Self {
            ids: state.ids,
            entities: state.entities,
        }
    }

    pub(crate) fn finish(self) -> EntityState<K, T> {
        EntityState {
            ids: self.ids,
            entities: self.entities,
        }
    }

    pub(crate) fn ids(&self) -> &[K] {
        &self.ids
    }

    pub(crate) fn entities(&self) -> &HashMap<K, T> {
        &self.entities
    }

    pub(crate) fn get(&self, id: &K) -> Option<&T> {
        self.entities.get(id)
    }

    pub(crate) fn contains(&self, id: &K) -> bool {
        self.entities.contains_key(id)
    }

    pub(crate) fn position(&self, id: &K) -> Option<usize> {
        self.ids.iter().position(|k| k == id)
    }

    pub(crate) fn ids_mut(&mut self) -> &mut Vec<K> {
        Arc::make_mut(&mut self.ids)
    }

    pub(crate) fn entities_mut(&mut self) -> &mut HashMap<K, T> {
        Arc::make_mut(&mut self.entities)
    }

    pub(crate) fn replace_ids(&mut self, ids: Vec<K>) {
        self.ids = Arc::new(ids);
    }

    /// Remove every listed key that is present. Returns how many were removed.
    pub(crate) fn remove_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a K>) -> usize
    where
        K: 'a,
    {
        let doomed: HashSet<&K> = ids.into_iter().filter(|id| self.contains(id)).collect();
        if doomed.is_empty() {
            return 0;
        }

        let entities = Arc::make_mut(&mut self.entities);
        for id in &doomed {
            entities.remove(*id);
        }
        Arc::make_mut(&mut self.ids).retain(|id| !doomed.contains(id));
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> EntityState<u32, &'static str> {
        let entities = [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
        EntityState::from_parts(vec![1, 2, 3], entities).unwrap()
    }

    #[test]
    fn untouched_draft_returns_same_state() {
        let original = state();
        let result = Draft::new(original.clone()).finish();
        assert!(result.ptr_eq(&original));
    }

    #[test]
    fn entity_write_keeps_ids_allocation() {
        let original = state();
        let mut draft = Draft::new(original.clone());
        draft.entities_mut().insert(2, "TWO");
        let result = draft.finish();

        assert!(result.ids_ptr_eq(&original));
        assert!(!result.entities_ptr_eq(&original));
        assert_eq!(original.get(&2), Some(&"two"));
        assert_eq!(result.get(&2), Some(&"TWO"));
    }

    #[test]
    fn remove_many_skips_absent_keys() {
        let original = state();
        let mut draft = Draft::new(original.clone());
        assert_eq!(draft.remove_many(&[9, 10]), 0);
        assert!(draft.finish().ptr_eq(&original));

        let mut draft = Draft::new(original.clone());
        assert_eq!(draft.remove_many(&[3, 1, 9]), 2);
        let result = draft.finish();
        assert_eq!(result.ids(), &[2]);
        assert_eq!(result.entities().len(), 1);
    }
}
