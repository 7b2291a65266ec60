//! Reducer trait for the store.

use super::action::Action;
use super::state::State;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Action) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: State;

    /// The action type this reducer handles.
    type Action: Action;

    /// State used when no prior state exists.
    fn initial_state(&self) -> Self::State;

    /// Process an action and return the new state.
    ///
    /// Returning the input snapshot unchanged signals that nothing changed.
    fn reduce(&self, state: Self::State, action: Self::Action) -> Self::State;

    /// Like [`Reducer::reduce`], treating an absent state as the initial one.
    fn reduce_optional(&self, state: Option<Self::State>, action: Self::Action) -> Self::State {
        let state = state.unwrap_or_else(|| self.initial_state());
        self.reduce(state, action)
    }
}
