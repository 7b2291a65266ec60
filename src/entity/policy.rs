//! Identity and ordering configuration for a collection.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Extracts the unique key of an entity.
pub type IdSelector<K, T> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// Total order over entities.
pub type SortComparer<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// How a collection identifies and orders its entities.
///
/// Fixed when the adapter is built. Without a comparer the collection keeps
/// append order.
pub struct Policy<K, T> {
    select_id: IdSelector<K, T>,
    sort_comparer: Option<SortComparer<T>>,
}

impl<K, T> Policy<K, T> {
    /// Policy keyed by `select_id`, unsorted.
    ///
    /// `select_id` must be pure: the same entity always yields the same key.
    pub fn new(select_id: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self {
            select_id: Arc::new(select_id),
            sort_comparer: None,
        }
    }

    /// Keep the collection sorted by `compare`.
    pub fn with_sort_comparer(
        mut self,
        compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort_comparer = Some(Arc::new(compare));
        self
    }

    pub fn select_id(&self, entity: &T) -> K {
        (self.select_id)(entity)
    }

    pub fn sort_comparer(&self) -> Option<&SortComparer<T>> {
        self.sort_comparer.as_ref()
    }

    pub fn is_sorted(&self) -> bool {
        self.sort_comparer.is_some()
    }
}

impl<K, T> Clone for Policy<K, T> {
    fn clone(&self) -> Self {
        Self {
            select_id: Arc::clone(&self.select_id),
            sort_comparer: self.sort_comparer.clone(),
        }
    }
}

impl<K, T> fmt::Debug for Policy<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("sorted", &self.is_sorted())
            .finish_non_exhaustive()
    }
}
