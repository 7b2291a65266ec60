//! Base trait for actions dispatched to a store.

/// Marker trait for action objects.
///
/// Actions describe one state transition, such as adding, updating or
/// removing entities. They are processed by reducers to produce new states.
pub trait Action: Send + 'static {}
