//! Actions carrying adapter operations through a store.

use serde::{Deserialize, Serialize};

use super::models::Update;
use crate::store::Action;

/// One adapter operation and its payload.
///
/// Serialized as an internally tagged object, e.g.
/// `{"type": "addOne", "entity": {...}}` or
/// `{"type": "updateOne", "update": {"id": "tgg", "changes": {...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntityAction<K, T, C> {
    AddOne { entity: T },
    AddMany { entities: Vec<T> },
    AddAll { entities: Vec<T> },
    SetOne { entity: T },
    SetMany { entities: Vec<T> },
    SetAll { entities: Vec<T> },
    RemoveOne { id: K },
    RemoveMany { ids: Vec<K> },
    RemoveAll,
    UpdateOne { update: Update<K, C> },
    UpdateMany { updates: Vec<Update<K, C>> },
    UpsertOne { update: Update<K, C> },
    UpsertMany { updates: Vec<Update<K, C>> },
}

impl<K, T, C> EntityAction<K, T, C> {
    /// Name of the operation, as it appears in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddOne { .. } => "addOne",
            Self::AddMany { .. } => "addMany",
            Self::AddAll { .. } => "addAll",
            Self::SetOne { .. } => "setOne",
            Self::SetMany { .. } => "setMany",
            Self::SetAll { .. } => "setAll",
            Self::RemoveOne { .. } => "removeOne",
            Self::RemoveMany { .. } => "removeMany",
            Self::RemoveAll => "removeAll",
            Self::UpdateOne { .. } => "updateOne",
            Self::UpdateMany { .. } => "updateMany",
            Self::UpsertOne { .. } => "upsertOne",
            Self::UpsertMany { .. } => "upsertMany",
        }
    }
}

impl<K, T, C> Action for EntityAction<K, T, C>
where
    K: Send + 'static,
    T: Send + 'static,
    C: Send + 'static,
{
}
