//! `autohire` command-line client.
//!
//! Restores the persisted session, optionally logs in, loads every
//! reservation and prints the blocked days of one car.
//!
//! # Usage
//!
//! ```bash
//! AUTOHIRE_API_URL=http://localhost:3000 \
//! AUTOHIRE_EMAIL=ada@example.com AUTOHIRE_PASSWORD=secret \
//!   cargo run --bin autohire -- 7
//! ```

use autohire_client::{Credentials, HttpRentalApi};
use autohire_core::environment::SystemClock;
use autohire_portal::app::{build_store, PortalEnvironment};
use autohire_portal::booking::{selectors as booking_selectors, BookingAction, BookingCalendar};
use autohire_portal::navigation::MemoryNavigator;
use autohire_portal::session::{selectors as session_selectors, SessionAction};
use autohire_portal::storage::{FileStore, SessionPersistence};
use autohire_portal::PortalConfig;
use autohire_runtime::StoreConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = PortalConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(fmt::layer())
        .init();

    info!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "Starting autohire");

    let persistence = SessionPersistence::new(Arc::new(FileStore::new(&config.state_dir)));
    let api = HttpRentalApi::new(&config.api_url, config.http_timeout)?
        .with_token_source(Arc::new(persistence.clone()));
    let navigator = MemoryNavigator::default();

    let store = build_store(
        PortalEnvironment::new(
            Arc::new(api),
            persistence,
            Arc::new(navigator.clone()),
            Arc::new(SystemClock),
        ),
        StoreConfig::default().with_broadcast_capacity(config.broadcast_capacity),
    );

    store.dispatch(SessionAction::Init.into())?.wait().await;

    if let (Ok(email), Ok(password)) = (std::env::var("AUTOHIRE_EMAIL"), std::env::var("AUTOHIRE_PASSWORD")) {
        store
            .dispatch(SessionAction::Login {
                credentials: Credentials::new(email, password),
            }
            .into())?
            .wait()
            .await;
    }

    match store.select(session_selectors::current_user) {
        Some(user) => info!(user = %user.full_name(), admin = user.is_admin(), "Session active"),
        None => {
            let reason = store.select(session_selectors::failure_reason);
            info!(reason = reason.as_deref().unwrap_or("no stored session"), "Not logged in");
        },
    }

    store
        .dispatch(BookingAction::LoadReservations.into())?
        .wait_with_timeout(config.http_timeout)
        .await?;

    if let Some(reason) = store.select(booking_selectors::failure_reason) {
        eprintln!("Could not load reservations: {reason}");
    } else if let Some(car_id) = std::env::args().nth(1) {
        let car_id: u64 = car_id.parse()?;
        let calendar = BookingCalendar::for_car(car_id, &store.state().booking);

        println!("Car {car_id}: {} blocked day(s)", calendar.blocked().len());
        for day in calendar.blocked() {
            println!("  {day}");
        }
    } else {
        println!("{} reservation(s) loaded", store.select(booking_selectors::reservations).len());
    }

    info!(visited = ?navigator.history(), "Navigation history");
    store.shutdown(config.shutdown_timeout).await?;
    Ok(())
}
