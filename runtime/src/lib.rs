//! # Autohire Runtime
//!
//! Store runtime for the Autohire state layer.
//!
//! The [`Store`] owns the root state, runs the reducer synchronously on every
//! dispatched action, broadcasts the action to observers and offers it to
//! every registered effect handler. Effects produced by the handlers are
//! executed here: local side effects in place, network effects on spawned
//! tokio tasks whose follow-up actions are dispatched back into the store.
//!
//! ## Example
//!
//! ```ignore
//! use autohire_runtime::Store;
//!
//! let store = Store::with_effects(
//!     AppState::default(),
//!     app_reducer(),
//!     environment,
//!     app_effects(),
//! );
//!
//! // Dispatch an action
//! let mut handle = store.dispatch(AppAction::Session(SessionAction::Init))?;
//! handle.wait().await;
//!
//! // Read state
//! let user = store.select(selectors::current_user);
//! ```

use autohire_core::{effect::Effect, effect::EffectHandler, reducer::Reducer, Action, Selector};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub use store::Store;
pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned by `dispatch()` once `shutdown()` has been called.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        ///
        /// Returned by `dispatch_and_wait_for` when the timeout expires before
        /// a matching action is observed.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// Boxed effect handler as registered with a [`Store`]
pub type BoxedEffectHandler<S, A, E> =
    Box<dyn EffectHandler<State = S, Action = A, Environment = E>>;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Interval at which `shutdown()` checks for remaining effects
    pub shutdown_poll_interval: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            shutdown_poll_interval: Duration::from_millis(25),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::dispatch()`]. Follow-up actions produced by the
/// effects of the dispatched action share the same handle, so waiting on it
/// covers the whole cascade.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.dispatch(BookingAction::LoadReservations)?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // LoadReservationsSucceeded / LoadReservationsFailed has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects of this cascade still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects of the cascade to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context shared by every effect of one cascade
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notifier.send_replace(());
        }
    }
}

/// Internal: RAII guard that decrements the cascade counter on drop
///
/// Runs even if the effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements the store-wide counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Action, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, BoxedEffectHandler,
        DecrementGuard, Duration, Effect, EffectHandle, EffectTracking, Ordering, Reducer,
        Selector, StoreConfig, StoreError,
    };
    use futures::Stream;
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::{broadcast, watch};

    /// The Store - single source of truth for one process
    ///
    /// The Store manages:
    /// 1. State (an `Arc` published through a `watch` channel)
    /// 2. Reducer (pure state transitions)
    /// 3. Effect handlers (I/O and local side effects)
    /// 4. Environment (injected dependencies)
    ///
    /// Cloning a `Store` is cheap; all clones share the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: Root state type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Root reducer
    pub struct Store<S, A, E, R> {
        inner: Arc<Inner<S, A, E, R>>,
    }

    struct Inner<S, A, E, R> {
        state: watch::Sender<Arc<S>>,
        reducer: R,
        handlers: Vec<BoxedEffectHandler<S, A, E>>,
        environment: E,
        action_broadcast: broadcast::Sender<A>,
        shutdown: AtomicBool,
        pending_effects: Arc<AtomicUsize>,
        config: StoreConfig,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        S: Send + Sync + 'static,
        A: Action,
        E: Send + Sync + 'static,
        R: Reducer<State = S, Action = A> + Send + Sync + 'static,
    {
        /// Create a store without effect handlers
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, Vec::new(), StoreConfig::default())
        }

        /// Create a store with effect handlers and the default configuration
        #[must_use]
        pub fn with_effects(
            initial_state: S,
            reducer: R,
            environment: E,
            handlers: Vec<BoxedEffectHandler<S, A, E>>,
        ) -> Self {
            Self::with_config(initial_state, reducer, environment, handlers, StoreConfig::default())
        }

        /// Create a store with effect handlers and an explicit configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            handlers: Vec<BoxedEffectHandler<S, A, E>>,
            config: StoreConfig,
        ) -> Self {
            let (state, _) = watch::channel(Arc::new(initial_state));
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            tracing::debug!(
                handlers = handlers.len(),
                broadcast_capacity = config.broadcast_capacity,
                "Store created"
            );

            Self {
                inner: Arc::new(Inner {
                    state,
                    reducer,
                    handlers,
                    environment,
                    action_broadcast,
                    shutdown: AtomicBool::new(false),
                    pending_effects: Arc::new(AtomicUsize::new(0)),
                    config,
                }),
            }
        }

        /// Injected dependencies
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.inner.environment
        }

        /// Snapshot of the current root state
        #[must_use]
        pub fn state(&self) -> Arc<S> {
            Arc::clone(&self.inner.state.borrow())
        }

        /// Project the current state through a selector
        pub fn select<Sel>(&self, selector: Sel) -> Sel::Output
        where
            Sel: Selector<S>,
        {
            selector.select(&self.state())
        }

        /// Stream of distinct selected values
        ///
        /// Yields the current value first, then every new value the selector
        /// produces after a state change. Consecutive equal values are
        /// suppressed. The stream ends when the store is dropped.
        pub fn observe<Sel, T>(&self, selector: Sel) -> Pin<Box<dyn Stream<Item = T> + Send>>
        where
            Sel: Selector<S, Output = T> + 'static,
            T: Clone + PartialEq + Send + 'static,
        {
            let mut rx = self.inner.state.subscribe();

            Box::pin(async_stream::stream! {
                let snapshot = Arc::clone(&rx.borrow_and_update());
                let mut last = selector.select(&snapshot);
                yield last.clone();

                while rx.changed().await.is_ok() {
                    let snapshot = Arc::clone(&rx.borrow_and_update());
                    let next = selector.select(&snapshot);
                    if next != last {
                        last = next.clone();
                        yield next;
                    }
                }
            })
        }

        /// Subscribe to every dispatched action
        ///
        /// The receiver gets a clone of each action after the reducer pass,
        /// whether it came from a caller or from an effect. A receiver that
        /// falls behind skips old actions ([`broadcast::error::RecvError::Lagged`]).
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.inner.action_broadcast.subscribe()
        }

        /// Number of effect tasks still running across all cascades
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.inner.pending_effects.load(Ordering::Acquire)
        }

        /// Dispatch an action
        ///
        /// 1. Runs the reducer synchronously under the state lock
        /// 2. Publishes the new state if the reducer produced a new allocation
        /// 3. Broadcasts the action to subscribers
        /// 4. Offers the action to every effect handler and executes the
        ///    returned effects
        ///
        /// Returns once the reducer pass and all inline effects are done;
        /// network effects keep running on spawned tasks.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), fields(kind = action.kind()), name = "store_dispatch")]
        pub fn dispatch(&self, action: A) -> Result<EffectHandle, StoreError> {
            let (handle, tracking) = EffectHandle::new();
            self.dispatch_tracked(action, &tracking)?;
            Ok(handle)
        }

        /// Dispatch an action and wait for a matching action
        ///
        /// Subscribes to the action broadcast before dispatching, then returns
        /// the first broadcast action matching `predicate`. The dispatched
        /// action itself is also offered to the predicate.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn dispatch_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.inner.action_broadcast.subscribe();

            self.dispatch(action)?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Initiate graceful shutdown
        ///
        /// Rejects further dispatches, then waits until every in-flight
        /// effect task has finished or `timeout` elapses.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still
        /// running when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.inner.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();

            loop {
                let pending = self.inner.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(self.inner.config.shutdown_poll_interval).await;
            }
        }

        fn dispatch_tracked(&self, action: A, tracking: &EffectTracking) -> Result<(), StoreError> {
            if self.inner.shutdown.load(Ordering::Acquire) {
                tracing::warn!(kind = action.kind(), "Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let kind = action.kind();
            let class = if action.is_intent() {
                "intent"
            } else if action.is_outcome() {
                "outcome"
            } else {
                "other"
            };
            tracing::debug!(kind, class, "Processing action");
            metrics::counter!("store.actions.total", "kind" => kind, "class" => class).increment(1);

            let start = std::time::Instant::now();
            let mut reduced = None;
            let changed = self.inner.state.send_if_modified(|current| {
                let next = self.inner.reducer.reduce(current, &action);
                let changed = !Arc::ptr_eq(current, &next);
                if changed {
                    *current = Arc::clone(&next);
                }
                reduced = Some(next);
                changed
            });
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            if changed {
                tracing::trace!(kind, "State changed");
                metrics::counter!("store.state.changes").increment(1);
            }

            let snapshot = reduced.unwrap_or_else(|| self.state());

            let _ = self.inner.action_broadcast.send(action.clone());

            // Every handler sees the action before any follow-up is dispatched
            let mut effects = Vec::new();
            for handler in &self.inner.handlers {
                let produced = handler.handle(&action, &snapshot, &self.inner.environment);
                if !produced.is_empty() {
                    tracing::trace!(handler = handler.name(), kind, count = produced.len(), "Effects produced");
                    effects.extend(produced);
                }
            }

            #[allow(clippy::cast_precision_loss)]
            metrics::histogram!("store.effects.count").record(effects.len() as f64);

            for effect in effects {
                self.execute_effect(effect, tracking);
            }

            Ok(())
        }

        /// Feed an action produced by an effect back into the store
        fn feedback(&self, action: A, tracking: &EffectTracking) {
            if let Err(error) = self.dispatch_tracked(action, tracking) {
                tracing::debug!(error = %error, "Dropped follow-up action");
            }
        }

        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F)
        where
            F: Future<Output = ()> + Send + 'static,
        {
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                tracing::error!("No tokio runtime available, effect dropped");
                metrics::counter!("store.effects.dropped").increment(1);
                return;
            };

            tracking.increment();
            self.inner.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.inner.pending_effects));

            runtime.spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                task.await;
            });
        }

        /// Execute an effect within a cascade
        ///
        /// - `None`: no-op
        /// - `Inline`: runs immediately on the dispatching task
        /// - `Future`: spawned, follow-up action dispatched on completion
        /// - `Delay`: spawned, action dispatched after the duration
        /// - `Parallel`: every child executed concurrently
        /// - `Sequential`: children executed in order, each cascade awaited
        ///   before the next starts
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Inline(run) => {
                    metrics::counter!("store.effects.executed", "type" => "inline").increment(1);
                    if let Some(next) = run() {
                        self.feedback(next, tracking);
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();
                    let cascade = tracking.clone();

                    self.spawn_tracked(tracking, async move {
                        if let Some(next) = fut.await {
                            tracing::trace!(kind = next.kind(), "Effect::Future produced an action");
                            store.feedback(next, &cascade);
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let store = self.clone();
                    let cascade = tracking.clone();

                    self.spawn_tracked(tracking, async move {
                        tokio::time::sleep(duration).await;
                        store.feedback(*action, &cascade);
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    let store = self.clone();

                    self.spawn_tracked(tracking, async move {
                        for effect in effects {
                            let (mut step, step_tracking) = EffectHandle::new();
                            store.execute_effect(effect, &step_tracking);
                            drop(step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use autohire_core::reducer::update;
    use autohire_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum CounterAction {
        Increment,
        Ignored,
        Announce,
    }

    impl Action for CounterAction {
        fn kind(&self) -> &'static str {
            match self {
                Self::Increment => "Increment",
                Self::Ignored => "Ignored",
                Self::Announce => "Announce",
            }
        }
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Action = CounterAction;

        fn reduce(&self, state: &Arc<Counter>, action: &CounterAction) -> Arc<Counter> {
            match action {
                CounterAction::Increment => update(state, |s| s.value += 1),
                CounterAction::Ignored | CounterAction::Announce => Arc::clone(state),
            }
        }
    }

    struct AnnounceThenIncrement;

    impl EffectHandler for AnnounceThenIncrement {
        type State = Counter;
        type Action = CounterAction;
        type Environment = ();

        fn name(&self) -> &'static str {
            "announce"
        }

        fn handle(&self, action: &CounterAction, _state: &Counter, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
            match action {
                CounterAction::Announce => smallvec![Effect::inline(|| Some(CounterAction::Increment))],
                _ => SmallVec::new(),
            }
        }
    }

    #[test]
    fn dispatch_without_runtime_runs_reducer_and_inline_effects() {
        let store = Store::with_effects(
            Counter::default(),
            CounterReducer,
            (),
            vec![Box::new(AnnounceThenIncrement)],
        );

        store.dispatch(CounterAction::Announce).unwrap();

        assert_eq!(store.select(|s: &Counter| s.value), 1);
    }

    #[test]
    fn ignored_action_keeps_state_allocation() {
        let store = Store::new(Counter::default(), CounterReducer, ());
        let before = store.state();

        store.dispatch(CounterAction::Ignored).unwrap();

        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn completed_handle_has_nothing_pending() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        tokio_test::block_on(handle.wait());
    }
}
