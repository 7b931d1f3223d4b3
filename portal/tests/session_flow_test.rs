//! End-to-end session flows through the portal store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use autohire_client::{ApiError, Credentials, Identity, Registration, Role, UserPatch, UNREACHABLE_MESSAGE};
use autohire_portal::app::{build_store, AppAction, PortalEnvironment, PortalStore};
use autohire_portal::navigation::MemoryNavigator;
use autohire_portal::session::{selectors, SessionAction};
use autohire_portal::storage::{DurableStore, FileStore, MemoryStore, SessionPersistence, SESSION_KEY};
use autohire_runtime::StoreConfig;
use autohire_testing::{test_clock, MockRentalApi};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

fn grace(role: Role) -> Identity {
    Identity {
        id: 1,
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        username: "grace".into(),
        email: "grace@example.com".into(),
        role,
        token: None,
    }
}

fn portal(api: &MockRentalApi, storage: Arc<dyn DurableStore>, navigator: &MemoryNavigator) -> PortalStore {
    build_store(
        PortalEnvironment::new(
            Arc::new(api.clone()),
            SessionPersistence::new(storage),
            Arc::new(navigator.clone()),
            Arc::new(test_clock()),
        ),
        StoreConfig::default(),
    )
}

fn login() -> AppAction {
    SessionAction::Login {
        credentials: Credentials::new("grace@example.com", "cobol"),
    }
    .into()
}

async fn dispatch(store: &PortalStore, action: AppAction) {
    store
        .dispatch(action)
        .unwrap()
        .wait_with_timeout(TIMEOUT)
        .await
        .unwrap();
}

fn is_login_succeeded(action: &AppAction) -> bool {
    matches!(action, AppAction::Session(SessionAction::LoginSucceeded { .. }))
}

async fn assert_session_survives_restart(storage: Arc<dyn DurableStore>) {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let navigator = MemoryNavigator::default();

    let first = portal(&api, Arc::clone(&storage), &navigator);
    dispatch(&first, login()).await;
    let logged_in = first.select(selectors::current_user).expect("logged in");
    assert_eq!(logged_in.token.as_deref(), Some("token-1"));

    let second = portal(&api, storage, &navigator);
    let restored = second
        .dispatch_and_wait_for(SessionAction::Init.into(), is_login_succeeded, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(
        restored,
        AppAction::Session(SessionAction::LoginSucceeded {
            identity: logged_in.clone(),
        })
    );
    assert_eq!(second.select(selectors::current_user), Some(logged_in));
    assert_eq!(api.call_count("login"), 1);
}

#[tokio::test]
async fn session_survives_restart_in_memory() {
    assert_session_survives_restart(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn session_survives_restart_on_disk() {
    let dir = std::env::temp_dir().join(format!("autohire-session-{}", uuid::Uuid::new_v4()));

    assert_session_survives_restart(Arc::new(FileStore::new(&dir))).await;

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn init_without_session_changes_nothing() {
    let store = portal(
        &MockRentalApi::new(),
        Arc::new(MemoryStore::new()),
        &MemoryNavigator::default(),
    );
    let before = store.state();

    dispatch(&store, SessionAction::Init.into()).await;

    assert!(Arc::ptr_eq(&before, &store.state()));
}

#[tokio::test]
async fn unreachable_server_reports_fixed_message() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    api.fail_next("login", ApiError::from_status(0, "<html>proxy error</html>"));
    let store = portal(&api, Arc::new(MemoryStore::new()), &MemoryNavigator::default());

    dispatch(&store, login()).await;

    assert!(!store.select(selectors::is_pending));
    assert!(!store.select(selectors::is_authenticated));
    assert_eq!(
        store.select(selectors::failure_reason).as_deref(),
        Some(UNREACHABLE_MESSAGE)
    );
}

#[tokio::test]
async fn login_follows_return_url() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let navigator = MemoryNavigator::new("/auth/login?returnUrl=%2Fbooking%2F7");
    let store = portal(&api, Arc::new(MemoryStore::new()), &navigator);

    dispatch(&store, login()).await;

    assert_eq!(navigator.history().last().map(String::as_str), Some("/booking/7"));
}

#[tokio::test]
async fn admins_land_on_admin_area() {
    let api = MockRentalApi::new().with_account(grace(Role::Admin), "cobol");
    let navigator = MemoryNavigator::new("/auth/login");
    let store = portal(&api, Arc::new(MemoryStore::new()), &navigator);

    dispatch(&store, login()).await;

    assert!(store.select(selectors::is_admin));
    assert_eq!(navigator.history().last().map(String::as_str), Some("/admin"));
}

#[tokio::test]
async fn logout_clears_storage_and_redirects() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let storage = MemoryStore::new();
    let navigator = MemoryNavigator::default();
    let store = portal(&api, Arc::new(storage.clone()), &navigator);

    dispatch(&store, login()).await;
    assert!(storage.load(SESSION_KEY).unwrap().is_some());

    dispatch(&store, SessionAction::Logout.into()).await;

    assert!(!store.select(selectors::is_authenticated));
    assert_eq!(storage.load(SESSION_KEY).unwrap(), None);
    assert_eq!(navigator.history().last().map(String::as_str), Some("/auth/login"));
}

#[tokio::test]
async fn profile_update_keeps_token() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let storage = MemoryStore::new();
    let persistence = SessionPersistence::new(Arc::new(storage.clone()));
    persistence
        .persist(&Identity {
            token: Some("T".into()),
            ..grace(Role::User)
        })
        .unwrap();

    let store = portal(&api, Arc::new(storage), &MemoryNavigator::default());
    dispatch(&store, SessionAction::Init.into()).await;

    let outcome = store
        .dispatch_and_wait_for(
            SessionAction::UpdateUser {
                patch: UserPatch {
                    last_name: Some("Murray Hopper".into()),
                    ..UserPatch::default()
                },
            }
            .into(),
            |action| matches!(action, AppAction::Session(SessionAction::UpdateUserSucceeded { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let AppAction::Session(SessionAction::UpdateUserSucceeded { identity }) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(identity.token.as_deref(), Some("T"));
    assert_eq!(identity.last_name, "Murray Hopper");
    assert_eq!(store.select(selectors::token).as_deref(), Some("T"));
    assert_eq!(persistence.restore(), Some(identity));
    assert!(!store.select(selectors::is_pending));
}

#[tokio::test]
async fn failed_profile_update_keeps_session() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let store = portal(&api, Arc::new(MemoryStore::new()), &MemoryNavigator::default());
    dispatch(&store, login()).await;

    api.fail_next(
        "update_user",
        ApiError::from_status(409, r#"{"message":"Email already in use"}"#),
    );
    dispatch(
        &store,
        SessionAction::UpdateUser {
            patch: UserPatch {
                email: Some("ada@example.com".into()),
                ..UserPatch::default()
            },
        }
        .into(),
    )
    .await;

    assert!(store.select(selectors::is_authenticated));
    assert_eq!(
        store.select(selectors::failure_reason).as_deref(),
        Some("Email already in use")
    );
    assert_eq!(
        store.select(selectors::current_user).map(|u| u.email),
        Some("grace@example.com".to_string())
    );
}

#[tokio::test]
async fn registration_logs_in_with_same_credentials() {
    let api = MockRentalApi::new();
    let store = portal(&api, Arc::new(MemoryStore::new()), &MemoryNavigator::default());

    dispatch(
        &store,
        SessionAction::Register {
            registration: Registration {
                first_name: "Katherine".into(),
                last_name: "Johnson".into(),
                username: "kj".into(),
                email: "kj@example.com".into(),
                password: "orbit".into(),
            },
        }
        .into(),
    )
    .await;

    assert_eq!(api.calls(), vec!["register", "login"]);
    let user = store.select(selectors::current_user).expect("logged in");
    assert_eq!(user.username, "kj");
    assert!(user.token.is_some());
}

#[tokio::test]
async fn duplicate_registration_is_reported() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let store = portal(&api, Arc::new(MemoryStore::new()), &MemoryNavigator::default());

    dispatch(
        &store,
        SessionAction::Register {
            registration: Registration {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                username: "grace".into(),
                email: "other@example.com".into(),
                password: "cobol".into(),
            },
        }
        .into(),
    )
    .await;

    assert!(!store.select(selectors::is_authenticated));
    assert_eq!(
        store.select(selectors::failure_reason).as_deref(),
        Some("Username or email already exists")
    );
}

#[tokio::test]
async fn logout_during_profile_update_stays_logged_out() {
    let api = MockRentalApi::new().with_account(grace(Role::User), "cobol");
    let storage = MemoryStore::new();
    let persistence = SessionPersistence::new(Arc::new(storage.clone()));
    persistence
        .persist(&Identity {
            token: Some("T".into()),
            ..grace(Role::User)
        })
        .unwrap();

    let store = portal(&api, Arc::new(storage.clone()), &MemoryNavigator::default());
    dispatch(&store, SessionAction::Init.into()).await;

    // The update reply is only processed once this task yields
    let mut update = store
        .dispatch(
            SessionAction::UpdateUser {
                patch: UserPatch {
                    first_name: Some("Amazing Grace".into()),
                    ..UserPatch::default()
                },
            }
            .into(),
        )
        .unwrap();
    dispatch(&store, SessionAction::Logout.into()).await;
    update.wait_with_timeout(TIMEOUT).await.unwrap();

    assert_eq!(api.call_count("update_user"), 1);
    assert!(!store.select(selectors::is_authenticated));
    assert_eq!(storage.load(SESSION_KEY).unwrap(), None);
    assert_eq!(persistence.restore(), None);
}
