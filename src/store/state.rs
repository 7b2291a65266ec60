//! Base trait for store state.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone to share a snapshot, never mutated in place)
/// - Cheap to clone (structural sharing)
/// - Comparable by identity, so "did anything change" is a pointer check
pub trait State: Clone + Send + Sync + 'static {
    /// Returns true if `other` is the very same snapshot, not merely an
    /// equal one.
    fn is_same(&self, other: &Self) -> bool;
}
