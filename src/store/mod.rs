//! Unidirectional state container primitives.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                                  │
//!    └──────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot, cheap to clone, compared by reference
//! - **Action**: Payload describing one state transition
//! - **Reducer**: Pure function that transforms state based on actions
//! - **Store**: Single-writer container that dispatches actions and
//!   publishes each new snapshot

mod action;
mod container;
mod reducer;
mod state;

pub use action::Action;
pub use container::Store;
pub use reducer::Reducer;
pub use state::State;
