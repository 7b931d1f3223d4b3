//! Root state, action and store composition.
//!
//! One store per process, built explicitly at startup:
//!
//! ```text
//! AppAction ─▶ app_reducer ─┬─ SessionReducer (session slice)
//!                           └─ BookingReducer (booking slice)
//!           ─▶ effect handlers (fan-out) ─▶ RentalApi / storage / navigation
//! ```

use crate::booking::{self, BookingAction, BookingReducer, BookingState};
use crate::navigation::Navigator;
use crate::session::{self, SessionAction, SessionReducer, SessionState};
use crate::storage::SessionPersistence;
use autohire_client::RentalApi;
use autohire_core::action::Action;
use autohire_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use autohire_core::environment::Clock;
use autohire_core::NaiveDate;
use autohire_runtime::{BoxedEffectHandler, Store, StoreConfig};
use std::sync::Arc;

/// Root state; every slice sits behind its own `Arc`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Session slice
    pub session: Arc<SessionState>,
    /// Booking slice
    pub booking: Arc<BookingState>,
}

/// Every action the store accepts
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    /// Session slice action
    Session(SessionAction),
    /// Booking slice action
    Booking(BookingAction),
}

impl AppAction {
    /// The session action, if this is one
    #[must_use]
    pub const fn as_session(&self) -> Option<&SessionAction> {
        match self {
            Self::Session(action) => Some(action),
            Self::Booking(_) => None,
        }
    }

    /// The booking action, if this is one
    #[must_use]
    pub const fn as_booking(&self) -> Option<&BookingAction> {
        match self {
            Self::Booking(action) => Some(action),
            Self::Session(_) => None,
        }
    }
}

impl Action for AppAction {
    fn kind(&self) -> &'static str {
        match self {
            Self::Session(action) => action.kind(),
            Self::Booking(action) => action.kind(),
        }
    }

    fn is_intent(&self) -> bool {
        match self {
            Self::Session(action) => action.is_intent(),
            Self::Booking(action) => action.is_intent(),
        }
    }

    fn is_outcome(&self) -> bool {
        match self {
            Self::Session(action) => action.is_outcome(),
            Self::Booking(action) => action.is_outcome(),
        }
    }
}

impl From<SessionAction> for AppAction {
    fn from(action: SessionAction) -> Self {
        Self::Session(action)
    }
}

impl From<BookingAction> for AppAction {
    fn from(action: BookingAction) -> Self {
        Self::Booking(action)
    }
}

/// Dependencies injected into effect handlers
#[derive(Clone)]
pub struct PortalEnvironment {
    /// Network collaborator
    pub api: Arc<dyn RentalApi>,
    /// Durable session record
    pub persistence: SessionPersistence,
    /// Route changes after login and logout
    pub navigator: Arc<dyn Navigator>,
    /// Calendar source for booking validation
    pub clock: Arc<dyn Clock>,
}

impl PortalEnvironment {
    /// Bundle the portal's collaborators
    #[must_use]
    pub fn new(
        api: Arc<dyn RentalApi>,
        persistence: SessionPersistence,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            persistence,
            navigator,
            clock,
        }
    }

    /// Today's date according to the injected clock
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

impl std::fmt::Debug for PortalEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalEnvironment")
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

/// Root reducer type
pub type AppReducer = CombinedReducer<AppState, AppAction>;

/// The portal store
pub type PortalStore = Store<AppState, AppAction, PortalEnvironment, AppReducer>;

/// Build the root reducer from the slice reducers
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(
            SessionReducer,
            |state: &AppState| &state.session,
            |state: &mut AppState, session| state.session = session,
            AppAction::as_session,
        )),
        Box::new(scope_reducer(
            BookingReducer,
            |state: &AppState| &state.booking,
            |state: &mut AppState, booking| state.booking = booking,
            AppAction::as_booking,
        )),
    ])
}

/// Every effect handler of the portal, session first
#[must_use]
pub fn app_effects() -> Vec<BoxedEffectHandler<AppState, AppAction, PortalEnvironment>> {
    let mut handlers = session::effects::handlers();
    handlers.extend(booking::effects::handlers());
    handlers
}

/// Build the portal store with an empty initial state
#[must_use]
pub fn build_store(environment: PortalEnvironment, config: StoreConfig) -> PortalStore {
    Store::with_config(
        AppState::default(),
        app_reducer(),
        environment,
        app_effects(),
        config,
    )
}
