//! Normalized entity collections.
//!
//! A collection is stored as an ordered list of keys plus a key-to-entity
//! map ([`EntityState`]). An [`EntityAdapter`] built from a [`Policy`]
//! provides pure operations that turn one state into the next, returning
//! the very same state when nothing changed.

mod action;
mod adapter;
mod draft;
pub mod invariants;
pub mod json;
mod models;
mod operations;
mod policy;
mod reducer;
mod sorted;
mod unsorted;

pub use action::EntityAction;
pub use adapter::EntityAdapter;
pub use invariants::InvariantViolation;
pub use models::{Changes, EntityState, Update};
pub use operations::StateOperations;
pub use policy::{IdSelector, Policy, SortComparer};
pub use reducer::EntityReducer;
pub use sorted::SortedStateAdapter;
pub use unsorted::UnsortedStateAdapter;
