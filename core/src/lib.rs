//! # Autohire Core
//!
//! Core traits and types for the Autohire client state layer.
//!
//! This crate provides the abstractions shared by every slice of the portal:
//! actions describing what happened, pure reducers computing the next state,
//! effect handlers performing I/O in reaction to actions, and selectors
//! projecting read-only views.
//!
//! ## Core Concepts
//!
//! - **State**: Immutable slice data, shared behind an `Arc`
//! - **Action**: An immutable record of user intent or a completed I/O outcome
//! - **Reducer**: Pure function `(Arc<State>, &Action) → Arc<State>`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Effect handler**: Reacts to every dispatched action with effect descriptions
//! - **Selector**: Pure read projection `&State → T`
//!
//! ## Architecture Principles
//!
//! - Single source of truth owned by the store
//! - Unidirectional data flow
//! - Reducers never perform I/O
//! - Unrecognised actions hand back the very same state allocation
//!
//! ## Example
//!
//! ```ignore
//! use autohire_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!
//!     fn reduce(&self, state: &Arc<CounterState>, action: &CounterAction) -> Arc<CounterState> {
//!         match action {
//!             CounterAction::Increment => reducer::update(state, |s| s.count += 1),
//!             _ => Arc::clone(state),
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Action module - the vocabulary of the store
///
/// Actions unify user intents (`Login`, `LoadReservations`) and completed
/// I/O outcomes (`LoginSucceeded`, `LoadReservationsFailed`). The
/// `#[derive(Action)]` macro in `autohire-macros` implements [`action::Action`]
/// for enums.
pub mod action {
    /// Common behaviour of every action type the store accepts
    pub trait Action: Clone + std::fmt::Debug + Send + Sync + 'static {
        /// Stable, human-readable name of the action variant
        ///
        /// Used for logging, metrics labels and effect filtering.
        fn kind(&self) -> &'static str;

        /// Returns true if the action describes user intent
        fn is_intent(&self) -> bool {
            false
        }

        /// Returns true if the action reports a completed I/O outcome
        fn is_outcome(&self) -> bool {
            false
        }
    }
}

/// Reducer module - pure state transitions
///
/// Reducers are pure functions: `(Arc<State>, &Action) → Arc<State>`.
///
/// A reducer that does not recognise an action must return
/// `Arc::clone(state)`. The store relies on pointer identity
/// ([`std::sync::Arc::ptr_eq`]) to decide whether anything changed.
pub mod reducer {
    use std::sync::Arc;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The slice state this reducer operates on
    /// - `Action`: The action type this reducer processes
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SessionReducer {
    ///     type State = SessionState;
    ///     type Action = SessionAction;
    ///
    ///     fn reduce(&self, state: &Arc<SessionState>, action: &SessionAction) -> Arc<SessionState> {
    ///         match action {
    ///             SessionAction::Logout => update(state, |s| s.current_user = None),
    ///             _ => Arc::clone(state),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// Reduce an action into the next state
        ///
        /// Must not perform I/O. Returns the same `Arc` when the action is
        /// not recognised or leaves the state untouched.
        fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;
    }

    /// Produce a modified copy of `state`
    ///
    /// Clones the current value, applies `f`, and wraps the result in a new
    /// `Arc`. Use only on the branches that actually change something.
    #[must_use]
    pub fn update<S, F>(state: &Arc<S>, f: F) -> Arc<S>
    where
        S: Clone,
        F: FnOnce(&mut S),
    {
        let mut next = S::clone(state);
        f(&mut next);
        Arc::new(next)
    }

    /// Returns true if a reducer produced a new state allocation
    #[must_use]
    pub fn changed<S>(before: &Arc<S>, after: &Arc<S>) -> bool {
        !Arc::ptr_eq(before, after)
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the store runtime.
/// They are values (not execution), produced by [`effect::EffectHandler`]s
/// after the reducer pass has completed.
pub mod effect {
    use smallvec::SmallVec;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from effect handlers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation, typically a network call
        ///
        /// Returns `Option<Action>` - if Some, the action is dispatched back into the store
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Local side effect run on the dispatching task right after the reducer pass
        ///
        /// Used for durable storage writes and navigation, which must observe
        /// actions in dispatch order.
        Inline(Box<dyn FnOnce() -> Option<Action> + Send>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Inline(_) => write!(f, "Effect::Inline(<fn>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap a future producing an optional follow-up action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Wrap a local side effect run right after the reducer pass
        #[must_use]
        pub fn inline<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Effect::Inline(Box::new(f))
        }

        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }

    /// An effect handler - reacts to dispatched actions
    ///
    /// Every handler registered with the store sees every dispatched action
    /// (fan-out), after the reducers have produced the new state. Handlers
    /// filter by action kind and return effect descriptions; a handler that
    /// is not interested returns an empty list.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl EffectHandler for LogoutEffect {
    ///     type State = AppState;
    ///     type Action = AppAction;
    ///     type Environment = PortalEnvironment;
    ///
    ///     fn name(&self) -> &'static str { "session.logout" }
    ///
    ///     fn handle(&self, action: &AppAction, _state: &AppState, env: &PortalEnvironment)
    ///         -> SmallVec<[Effect<AppAction>; 4]>
    ///     {
    ///         let AppAction::Session(SessionAction::Logout) = action else {
    ///             return SmallVec::new();
    ///         };
    ///         let storage = env.session_storage.clone();
    ///         smallvec![Effect::inline(move || { storage.clear(); None })]
    ///     }
    /// }
    /// ```
    pub trait EffectHandler: Send + Sync {
        /// The state type visible to the handler (post-reduction)
        type State;

        /// The action type this handler reacts to and produces
        type Action;

        /// Injected dependencies (network client, storage, navigation)
        type Environment;

        /// Name used in logs and metrics
        fn name(&self) -> &'static str;

        /// React to an action with zero or more effects
        fn handle(
            &self,
            action: &Self::Action,
            state: &Self::State,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Selector module - pure read projections
///
/// Any `Fn(&State) -> T` is a selector. Parameterised selectors are plain
/// functions returning closures.
pub mod selector {
    /// A pure projection from state to a derived value
    pub trait Selector<S>: Send + Sync {
        /// The projected value
        type Output;

        /// Project the state
        fn select(&self, state: &S) -> Self::Output;
    }

    impl<S, T, F> Selector<S> for F
    where
        F: Fn(&S) -> T + Send + Sync,
    {
        type Output = T;

        fn select(&self, state: &S) -> T {
            self(state)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits and injected into
/// effect handlers through their `Environment`.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Current calendar day (UTC)
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

pub use action::Action;
pub use effect::{Effect, EffectHandler};
pub use reducer::Reducer;
pub use selector::Selector;
