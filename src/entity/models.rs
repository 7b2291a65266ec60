//! Normalized collection state and update descriptors.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::invariants::{self, InvariantViolation};
use crate::store::State;

/// A collection stored as a key-order list plus a key-to-entity map.
///
/// Both halves sit behind `Arc`s. Cloning a state is O(1) and operations
/// only replace the half they actually change, so callers can detect
/// "nothing changed" or "order unchanged" by pointer comparison with
/// [`EntityState::ptr_eq`] and [`EntityState::ids_ptr_eq`].
pub struct EntityState<K, T> {
    pub(crate) ids: Arc<Vec<K>>,
    pub(crate) entities: Arc<HashMap<K, T>>,
}

impl<K, T> EntityState<K, T> {
    /// An empty collection.
    pub fn new() -> Self {
        Self {
            ids: Arc::new(Vec::new()),
            entities: Arc::new(HashMap::new()),
        }
    }

    /// Keys in collection order.
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// Key-to-entity map.
    pub fn entities(&self) -> &HashMap<K, T> {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True if both states share the same `ids` and `entities` allocations.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.ids_ptr_eq(other) && self.entities_ptr_eq(other)
    }

    /// True if both states share the same `ids` sequence.
    pub fn ids_ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ids, &other.ids)
    }

    /// True if both states share the same `entities` map.
    pub fn entities_ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entities, &other.entities)
    }
}

impl<K: Eq + Hash, T> EntityState<K, T> {
    /// Build a state from a supplied snapshot.
    ///
    /// # Errors
    /// Returns an error if `ids` holds duplicates or does not match the key
    /// set of `entities`.
    pub fn from_parts(ids: Vec<K>, entities: HashMap<K, T>) -> Result<Self, InvariantViolation> {
        invariants::check_structure(&ids, &entities)?;
        Ok(Self {
            ids: Arc::new(ids),
            entities: Arc::new(entities),
        })
    }

    /// Wrap parts already known to be in bijection.
    pub(crate) fn from_indexed(ids: Vec<K>, entities: HashMap<K, T>) -> Self {
        Self {
            ids: Arc::new(ids),
            entities: Arc::new(entities),
        }
    }

    pub fn get(&self, id: &K) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.entities.contains_key(id)
    }

    /// Entities in `ids` order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }
}

impl<K, T> Clone for EntityState<K, T> {
    fn clone(&self) -> Self {
        Self {
            ids: Arc::clone(&self.ids),
            entities: Arc::clone(&self.entities),
        }
    }
}

impl<K, T> Default for EntityState<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for EntityState<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityState")
            .field("ids", &self.ids)
            .field("entities", &self.entities)
            .finish()
    }
}

/// Content equality. Use [`EntityState::ptr_eq`] for identity.
impl<K: Eq + Hash, T: PartialEq> PartialEq for EntityState<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.entities == other.entities
    }
}

impl<K, T> State for EntityState<K, T>
where
    K: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn is_same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K, T> Serialize for EntityState<K, T>
where
    K: Serialize + Eq + Hash,
    T: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut snapshot = serializer.serialize_struct("EntityState", 2)?;
        snapshot.serialize_field("ids", self.ids.as_slice())?;
        snapshot.serialize_field("entities", self.entities.as_ref())?;
        snapshot.end()
    }
}

#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Eq + Hash, T: Deserialize<'de>"))]
struct Snapshot<K, T> {
    ids: Vec<K>,
    entities: HashMap<K, T>,
}

impl<'de, K, T> Deserialize<'de> for EntityState<K, T>
where
    K: Deserialize<'de> + Eq + Hash,
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<K, T>::deserialize(deserializer)?;
        Self::from_parts(snapshot.ids, snapshot.entities).map_err(serde::de::Error::custom)
    }
}

/// A patch addressed to one entity by key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Update<K, C> {
    pub id: K,
    pub changes: C,
}

impl<K, C> Update<K, C> {
    pub fn new(id: K, changes: C) -> Self {
        Self { id, changes }
    }
}

/// A sparse set of field overwrites for entities of type `T`.
pub trait Changes<T> {
    /// Shallow-merge these changes onto `entity`.
    fn apply(&self, entity: &T) -> T;

    /// The complete entity these changes describe on their own.
    ///
    /// Used when an upsert targets an absent key. `None` means the changes
    /// do not cover a whole entity and the insert is skipped.
    fn into_entity(self) -> Option<T>;
}

/// A full entity is a patch that replaces every field.
impl<T: Clone> Changes<T> for T {
    fn apply(&self, _entity: &T) -> T {
        self.clone()
    }

    fn into_entity(self) -> Option<T> {
        Some(self)
    }
}
