//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use autohire_core::reducer::Reducer;
use std::sync::Arc;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use autohire_testing::ReducerTest;
///
/// ReducerTest::new(SessionReducer)
///     .given_state(SessionState::default())
///     .when_action(SessionAction::Login { credentials })
///     .then_state(|state| {
///         assert!(state.pending);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A>
where
    R: Reducer<State = S, Action = A>,
{
    reducer: R,
    initial_state: Option<Arc<S>>,
    actions: Vec<A>,
    expect_unchanged: bool,
    state_assertions: Vec<StateAssertion<S>>,
}

impl<R, S, A> ReducerTest<R, S, A>
where
    R: Reducer<State = S, Action = A>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            expect_unchanged: false,
            state_assertions: Vec::new(),
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(Arc::new(state));
        self
    }

    /// Add an action to reduce (When); several actions are reduced in order
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Assert the reducer handed back the very same allocation (Then)
    #[must_use]
    pub const fn then_unchanged(mut self) -> Self {
        self.expect_unchanged = true;
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state or action is not set, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let initial = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(!self.actions.is_empty(), "Action must be set with when_action()");

        let mut state = Arc::clone(&initial);
        for action in &self.actions {
            state = self.reducer.reduce(&state, action);
        }

        if self.expect_unchanged {
            assert!(
                Arc::ptr_eq(&initial, &state),
                "Expected the reducer to return the same state allocation"
            );
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use autohire_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain at least one Inline effect
    ///
    /// # Panics
    ///
    /// Panics if no Inline effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_inline_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Inline(_))),
            "Expected at least one Inline effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohire_core::effect::Effect;
    use autohire_core::reducer::update;

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
        Ignore,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;

        fn reduce(&self, state: &Arc<TestState>, action: &TestAction) -> Arc<TestState> {
            match action {
                TestAction::Increment => update(state, |s| s.count += 1),
                TestAction::Decrement => update(state, |s| s.count -= 1),
                TestAction::Ignore => Arc::clone(state),
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_sequence() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Decrement)
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 3);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_unchanged() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Ignore)
            .then_unchanged()
            .run();
    }

    #[test]
    #[should_panic(expected = "same state allocation")]
    fn test_reducer_test_unchanged_detects_change() {
        ReducerTest::new(TestReducer)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Increment)
            .then_unchanged()
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<TestAction>::None], 1);
        assertions::assert_effects_count::<TestAction>(&[], 0);
    }
}
