//! # Autohire Portal
//!
//! Client-side state layer of the car-rental portal.
//!
//! - [`session`]: who is logged in, login/logout/registration/profile flows
//! - [`booking`]: the reservation list, the blocked-date resolver and pricing
//! - [`app`]: root state and action, reducer composition, store construction
//! - [`storage`]: durable session record
//! - [`navigation`] and [`guards`]: redirects after login and logout, route checks
//! - [`config`]: environment configuration of the `autohire` binary
//!
//! ## Example
//!
//! ```no_run
//! use autohire_client::{Credentials, HttpRentalApi};
//! use autohire_core::environment::SystemClock;
//! use autohire_portal::app::{build_store, PortalEnvironment};
//! use autohire_portal::navigation::MemoryNavigator;
//! use autohire_portal::session::{selectors, SessionAction};
//! use autohire_portal::storage::{MemoryStore, SessionPersistence};
//! use autohire_runtime::StoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let persistence = SessionPersistence::new(Arc::new(MemoryStore::new()));
//! let api = HttpRentalApi::new("http://localhost:3000", Duration::from_secs(10))?
//!     .with_token_source(Arc::new(persistence.clone()));
//!
//! let store = build_store(
//!     PortalEnvironment::new(
//!         Arc::new(api),
//!         persistence,
//!         Arc::new(MemoryNavigator::default()),
//!         Arc::new(SystemClock),
//!     ),
//!     StoreConfig::default(),
//! );
//!
//! store
//!     .dispatch(SessionAction::Login {
//!         credentials: Credentials::new("ada@example.com", "secret"),
//!     }
//!     .into())?
//!     .wait()
//!     .await;
//!
//! println!("logged in: {}", store.select(selectors::is_authenticated));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod booking;
pub mod config;
pub mod guards;
pub mod navigation;
pub mod session;
pub mod storage;

pub use app::{build_store, AppAction, AppState, PortalEnvironment, PortalStore};
pub use config::{ConfigError, PortalConfig};
