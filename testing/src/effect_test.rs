//! Testing utilities for effect handlers
//!
//! Effect handlers return descriptions; [`run_effects`] executes them the
//! way the store would, but collects follow-up actions instead of
//! dispatching them.

#![allow(clippy::module_name_repetitions)]

use autohire_core::effect::{Effect, EffectHandler};
use std::future::Future;
use std::pin::Pin;

/// Type alias for follow-up action assertions
type ActionsAssertion<A> = Box<dyn FnOnce(&[A])>;

/// Execute one effect and collect the actions it produces
///
/// Parallel children are awaited together; their actions are returned in
/// declaration order.
pub fn run_effect<A>(effect: Effect<A>) -> Pin<Box<dyn Future<Output = Vec<A>> + Send>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Inline(run) => run().into_iter().collect(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                vec![*action]
            },
            Effect::Parallel(effects) => futures::future::join_all(effects.into_iter().map(run_effect))
                .await
                .into_iter()
                .flatten()
                .collect(),
            Effect::Sequential(effects) => {
                let mut actions = Vec::new();
                for effect in effects {
                    actions.extend(run_effect(effect).await);
                }
                actions
            },
        }
    })
}

/// Execute effects in order and collect every produced action
pub async fn run_effects<A, I>(effects: I) -> Vec<A>
where
    A: Send + 'static,
    I: IntoIterator<Item = Effect<A>>,
{
    let mut actions = Vec::new();
    for effect in effects {
        actions.extend(run_effect(effect).await);
    }
    actions
}

/// Fluent API for testing effect handlers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// EffectTest::new(LoginEffect)
///     .with_env(environment)
///     .given_state(AppState::default())
///     .when_action(SessionAction::Login { credentials }.into())
///     .then_actions(|actions| {
///         assert!(matches!(actions, [AppAction::Session(SessionAction::LoginSucceeded { .. })]));
///     })
///     .run()
///     .await;
/// ```
pub struct EffectTest<H>
where
    H: EffectHandler,
{
    handler: H,
    environment: Option<H::Environment>,
    state: Option<H::State>,
    action: Option<H::Action>,
    expected_effects: Option<usize>,
    assertions: Vec<ActionsAssertion<H::Action>>,
}

impl<H> EffectTest<H>
where
    H: EffectHandler,
    H::Action: Send + 'static,
{
    /// Create a new effect test for `handler`
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            environment: None,
            state: None,
            action: None,
            expected_effects: None,
            assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: H::Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the post-reduction state the handler sees (Given)
    #[must_use]
    pub fn given_state(mut self, state: H::State) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the action offered to the handler (When)
    #[must_use]
    pub fn when_action(mut self, action: H::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Assert how many effects the handler returns (Then)
    #[must_use]
    pub const fn then_effect_count(mut self, count: usize) -> Self {
        self.expected_effects = Some(count);
        self
    }

    /// Add an assertion about the follow-up actions (Then)
    #[must_use]
    pub fn then_actions<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[H::Action]) + 'static,
    {
        self.assertions.push(Box::new(assertion));
        self
    }

    /// Run the handler, execute its effects and check all assertions
    ///
    /// # Panics
    ///
    /// Panics if environment, state or action is not set, or if any
    /// assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run(self) -> Vec<H::Action> {
        let env = self
            .environment
            .expect("Environment must be set with with_env()");
        let state = self.state.expect("State must be set with given_state()");
        let action = self.action.expect("Action must be set with when_action()");

        let effects = self.handler.handle(&action, &state, &env);

        if let Some(expected) = self.expected_effects {
            assert_eq!(
                effects.len(),
                expected,
                "Expected {} effects from {}, but found {}",
                expected,
                self.handler.name(),
                effects.len()
            );
        }

        let actions = run_effects(effects).await;

        for assertion in self.assertions {
            assertion(&actions);
        }

        actions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use autohire_core::{smallvec, SmallVec};
    use std::time::Duration;

    #[test]
    fn test_run_effects_collects_in_order() {
        let effects = vec![
            Effect::inline(|| Some(1)),
            Effect::None,
            Effect::chain(vec![Effect::future(async { Some(2) }), Effect::inline(|| None)]),
            Effect::merge(vec![Effect::future(async { Some(3) }), Effect::future(async { Some(4) })]),
        ];

        let actions = tokio_test::block_on(run_effects(effects));
        assert_eq!(actions, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_delay_yields_action() {
        let actions = run_effects(vec![Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(9),
        }])
        .await;
        assert_eq!(actions, vec![9]);
    }

    struct Doubler;

    impl EffectHandler for Doubler {
        type State = i32;
        type Action = i32;
        type Environment = ();

        fn name(&self) -> &'static str {
            "doubler"
        }

        fn handle(&self, action: &i32, state: &i32, _env: &()) -> SmallVec<[Effect<i32>; 4]> {
            let next = action * 2 + state;
            smallvec![Effect::future(async move { Some(next) })]
        }
    }

    #[tokio::test]
    async fn test_effect_test_runs_handler() {
        let actions = EffectTest::new(Doubler)
            .with_env(())
            .given_state(1)
            .when_action(5)
            .then_effect_count(1)
            .then_actions(|actions| assert_eq!(actions, &[11]))
            .run()
            .await;

        assert_eq!(actions, vec![11]);
    }
}
