//! Structural checks for normalized collection state.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use thiserror::Error;

use super::models::EntityState;
use super::policy::Policy;

/// A broken invariant, reported by position in `ids`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("id at position {position} appears more than once")]
    DuplicateId { position: usize },

    #[error("id at position {position} has no entity")]
    MissingEntity { position: usize },

    #[error("{count} entities have no id in the ids sequence")]
    OrphanEntities { count: usize },

    #[error("entity at position {position} is stored under a key its id selector does not produce")]
    KeyMismatch { position: usize },

    #[error("entity at position {position} sorts before its predecessor")]
    OutOfOrder { position: usize },
}

/// Check that `ids` and the keys of `entities` are in bijection.
pub fn check_structure<K, T>(ids: &[K], entities: &HashMap<K, T>) -> Result<(), InvariantViolation>
where
    K: Eq + Hash,
{
    let mut seen = HashSet::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        if !seen.insert(id) {
            return Err(InvariantViolation::DuplicateId { position });
        }
        if !entities.contains_key(id) {
            return Err(InvariantViolation::MissingEntity { position });
        }
    }

    if entities.len() != ids.len() {
        return Err(InvariantViolation::OrphanEntities {
            count: entities.len() - ids.len(),
        });
    }

    Ok(())
}

/// Check structure, key consistency and (when sorted) order.
pub fn check<K, T>(policy: &Policy<K, T>, state: &EntityState<K, T>) -> Result<(), InvariantViolation>
where
    K: Eq + Hash,
{
    check_structure(state.ids(), state.entities())?;

    let entities: Vec<&T> = state.iter().collect();
    for (position, (id, entity)) in state.ids().iter().zip(&entities).enumerate() {
        if policy.select_id(entity) != *id {
            return Err(InvariantViolation::KeyMismatch { position });
        }
    }

    if let Some(compare) = policy.sort_comparer() {
        for (offset, pair) in entities.windows(2).enumerate() {
            if compare(pair[0], pair[1]) == Ordering::Greater {
                return Err(InvariantViolation::OutOfOrder { position: offset + 1 });
            }
        }
    }

    Ok(())
}
