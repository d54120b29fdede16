//! Admin access gate tests

use std::sync::Arc;

use chrono::Duration;
use invitelytics::analytics::ManualClock;
use invitelytics::auth::{AccessGate, LocalAdminGate};
use invitelytics::config::AdminConfig;
use invitelytics::storage::{KeyValueStore, MemoryStore, NullStore, keys};
use invitelytics::utils::password::hash_password;

fn config(password: &str) -> AdminConfig {
    AdminConfig {
        email: "host@example.com".to_string(),
        password: password.to_string(),
        session_hours: 24,
    }
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new("2025-06-01T10:00:00Z".parse().unwrap()))
}

#[test]
fn test_login_stores_gate_keys() {
    let store = Arc::new(MemoryStore::new());
    let gate = LocalAdminGate::new(store.clone(), config("letmein")).with_clock(clock());

    assert!(!gate.is_authorized());
    gate.login("host@example.com", "letmein").unwrap();

    assert!(gate.is_authorized());
    assert_eq!(gate.current_user().as_deref(), Some("host@example.com"));
    assert_eq!(
        store.get_item(keys::ADMIN_LOGIN_TIME).unwrap().as_deref(),
        Some("1748772000000")
    );
    assert!(store.get_item(keys::ADMIN_TOKEN).unwrap().is_some());
}

#[test]
fn test_wrong_credentials_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let gate = LocalAdminGate::new(store.clone(), config("letmein"));

    let err = gate.login("host@example.com", "LETMEIN").unwrap_err();
    assert_eq!(err.code(), "E009");
    assert!(gate.login("guest@example.com", "letmein").is_err());
    assert!(store.is_empty());
}

#[test]
fn test_empty_password_disables_login() {
    let gate = LocalAdminGate::new(Arc::new(MemoryStore::new()), config(""));
    assert!(gate.login("host@example.com", "").is_err());
    assert!(!gate.is_authorized());
}

#[test]
fn test_argon2_password() {
    let hash = hash_password("letmein").unwrap();
    let gate = LocalAdminGate::new(Arc::new(MemoryStore::new()), config(&hash));

    assert!(gate.login("host@example.com", "nope").is_err());
    assert!(gate.login("host@example.com", "letmein").is_ok());
    assert!(gate.is_authorized());
}

#[test]
fn test_logout_clears_only_gate_keys() {
    let store = Arc::new(MemoryStore::new());
    store.set_item(keys::VISIT_COUNT, "5").unwrap();
    let gate = LocalAdminGate::new(store.clone(), config("letmein"));

    gate.login("host@example.com", "letmein").unwrap();
    gate.logout();

    assert!(!gate.is_authorized());
    assert_eq!(gate.current_user(), None);
    assert_eq!(store.get_item(keys::VISIT_COUNT).unwrap().as_deref(), Some("5"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_expired_session_is_cleared_on_check() {
    let clock = clock();
    let store = Arc::new(MemoryStore::new());
    let gate = LocalAdminGate::new(store.clone(), config("letmein")).with_clock(clock.clone());
    gate.login("host@example.com", "letmein").unwrap();

    clock.advance(Duration::hours(24) + Duration::milliseconds(1));
    assert!(!gate.is_authorized());
    assert!(store.is_empty());
}

#[test]
fn test_changed_admin_email_invalidates_session() {
    let store = Arc::new(MemoryStore::new());
    LocalAdminGate::new(store.clone(), config("letmein"))
        .login("host@example.com", "letmein")
        .unwrap();

    let mut other = config("letmein");
    other.email = "planner@example.com".to_string();
    assert!(!LocalAdminGate::new(store, other).is_authorized());
}

#[test]
fn test_login_fails_without_storage() {
    let gate = LocalAdminGate::new(Arc::new(NullStore::new()), config("letmein"));
    let err = gate.login("host@example.com", "letmein").unwrap_err();
    assert_eq!(err.code(), "E001");
    assert!(!gate.is_authorized());
}
