//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one slice of a larger state
//!
//! Both preserve state identity: when no inner reducer produces a new
//! allocation, the composed reducer hands back the original `Arc`.
//!
//! # Examples
//!
//! ```
//! use autohire_core::composition::scope_reducer;
//! use autohire_core::reducer::{update, Reducer};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! enum AppAction {
//!     Counter(CounterAction),
//!     Other,
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: Arc<CounterState>,
//!     title: String,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!
//!     fn reduce(&self, state: &Arc<CounterState>, action: &CounterAction) -> Arc<CounterState> {
//!         match action {
//!             CounterAction::Increment => update(state, |s| s.count += 1),
//!         }
//!     }
//! }
//!
//! let scoped = scope_reducer(
//!     CounterReducer,
//!     |app: &AppState| &app.counter,
//!     |app: &mut AppState, counter| app.counter = counter,
//!     |action: &AppAction| match action {
//!         AppAction::Counter(inner) => Some(inner),
//!         AppAction::Other => None,
//!     },
//! );
//!
//! let state = Arc::new(AppState::default());
//! let next = scoped.reduce(&state, &AppAction::Counter(CounterAction::Increment));
//! assert_eq!(next.counter.count, 1);
//!
//! let untouched = scoped.reduce(&next, &AppAction::Other);
//! assert!(Arc::ptr_eq(&next, &untouched));
//! ```

use crate::reducer::Reducer;
use std::marker::PhantomData;
use std::sync::Arc;

/// Boxed reducer trait object accepted by [`combine_reducers`]
pub type BoxedReducer<S, A> = Box<dyn Reducer<State = S, Action = A> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, threading the state produced by one into
/// the next. Returns the input `Arc` untouched if no reducer changed anything.
#[must_use]
pub fn combine_reducers<S, A>(reducers: Vec<BoxedReducer<S, A>>) -> CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    reducers: Vec<BoxedReducer<S, A>>,
}

impl<S, A> Reducer for CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
        let mut current = Arc::clone(state);

        for reducer in &self.reducers {
            current = reducer.reduce(&current, action);
        }

        current
    }
}

/// Scopes a reducer to operate on one slice of a larger state.
///
/// # Arguments
///
/// - `reducer`: the slice reducer
/// - `get_state`: borrow the slice out of the parent state
/// - `set_state`: write a new slice into a copy of the parent state
/// - `get_action`: extract the slice action, `None` for actions of other slices
pub fn scope_reducer<S, SubS, A, SubA, R>(
    reducer: R,
    get_state: fn(&S) -> &Arc<SubS>,
    set_state: fn(&mut S, Arc<SubS>),
    get_action: fn(&A) -> Option<&SubA>,
) -> ScopedReducer<S, SubS, A, SubA, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    SubA: 'static,
    R: Reducer<State = SubS, Action = SubA>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        get_action,
        _phantom: PhantomData,
    }
}

/// A scoped reducer that operates on a slice of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    SubA: 'static,
    R: Reducer<State = SubS, Action = SubA>,
{
    reducer: R,
    get_state: fn(&S) -> &Arc<SubS>,
    set_state: fn(&mut S, Arc<SubS>),
    get_action: fn(&A) -> Option<&SubA>,
    _phantom: PhantomData<fn(&S, &A)>,
}

impl<S, SubS, A, SubA, R> Reducer for ScopedReducer<S, SubS, A, SubA, R>
where
    S: Clone + 'static,
    SubS: 'static,
    A: 'static,
    SubA: 'static,
    R: Reducer<State = SubS, Action = SubA>,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
        let Some(sub_action) = (self.get_action)(action) else {
            return Arc::clone(state);
        };

        let before = (self.get_state)(state);
        let after = self.reducer.reduce(before, sub_action);

        if Arc::ptr_eq(before, &after) {
            return Arc::clone(state);
        }

        let mut next = S::clone(state);
        (self.set_state)(&mut next, after);
        Arc::new(next)
    }
}
