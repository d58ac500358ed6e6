use std::sync::Arc;

use shopfront::models::{Registration, Role};
use shopfront::session::Session;
use shopfront::store::{KeyValueStore, MemoryStore, CURRENT_USER_KEY, USERS_KEY};
use shopfront::users::UserStorage;
use shopfront::Error;

fn store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

fn registration(email: &str) -> Registration {
    Registration {
        name: "Ana".to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
    }
}

#[test]
fn admin_is_seeded_exactly_once() {
    let store = store();
    let users = UserStorage::new(store.clone());

    users.ensure_admin().unwrap();
    users.ensure_admin().unwrap();

    let all = users.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "admin@admin.com");
    assert_eq!(all[0].role, Role::Admin);

    // The seeded password is hashed, and it verifies at login
    assert_ne!(all[0].password_hash, "admin1234");
    let admin = Session::new(store).login("admin@admin.com", "admin1234").unwrap();
    assert_eq!(admin.role, Role::Admin);
}

#[test]
fn register_stores_a_hash_not_the_password() {
    let store = store();
    let users = UserStorage::new(store.clone());

    users.register(registration("ana@example.com")).unwrap();

    let stored = users.find_by_email("ana@example.com").unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert!(!store.get(USERS_KEY).unwrap().unwrap().contains("secret1"));
}

#[test]
fn duplicate_email_is_rejected_case_insensitively() {
    let users = UserStorage::new(store());

    users.register(registration("ana@example.com")).unwrap();
    let err = users.register(registration("ANA@example.com")).unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(users.list().unwrap().len(), 1);
}

#[test]
fn mismatched_confirmation_fails_before_any_write() {
    let store = store();
    let users = UserStorage::new(store.clone());

    let mut reg = registration("ana@example.com");
    reg.confirm_password = "something-else".to_string();
    let err = users.register(reg).unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    // The collection key was never touched
    assert!(store.get(USERS_KEY).unwrap().is_none());
}

#[test]
fn wrong_password_fails_and_leaves_no_session() {
    let store = store();
    UserStorage::new(store.clone())
        .register(registration("ana@example.com"))
        .unwrap();

    let session = Session::new(store.clone());
    let err = session.login("ana@example.com", "wrong-password").unwrap_err();

    assert!(matches!(err, Error::InvalidCredentials));
    assert!(session.current().unwrap().is_none());
    assert!(!session.is_authenticated().unwrap());
}

#[test]
fn unknown_email_fails_with_the_same_credentials_error() {
    let session = Session::new(store());
    // Well-formed email, but nobody registered
    let err = session.login("ghost@example.com", "secret1").unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
}

#[test]
fn malformed_login_input_is_rejected_before_the_scan() {
    let session = Session::new(store());

    assert!(matches!(
        session.login("", "secret1").unwrap_err(),
        Error::Validation(_)
    ));
    assert!(matches!(
        session.login("not-an-email", "secret1").unwrap_err(),
        Error::Validation(_)
    ));
    assert!(matches!(
        session.login("ana@example.com", "").unwrap_err(),
        Error::Validation(_)
    ));
}

#[test]
fn login_persists_a_password_stripped_user() {
    let store = store();
    UserStorage::new(store.clone())
        .register(registration("ana@example.com"))
        .unwrap();

    let session = Session::new(store.clone());
    let user = session.login("ana@example.com", "secret1").unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::User);

    let raw = store.get(CURRENT_USER_KEY).unwrap().unwrap();
    assert!(!raw.contains("password"));

    let current = session.current().unwrap().unwrap();
    assert_eq!(current.id, user.id);
    assert!(session.is_authenticated().unwrap());
    assert!(!session.is_admin().unwrap());
}

#[test]
fn logout_clears_the_session_and_is_idempotent() {
    let store = store();
    UserStorage::new(store.clone())
        .register(registration("ana@example.com"))
        .unwrap();

    let session = Session::new(store);
    session.login("ana@example.com", "secret1").unwrap();
    assert!(session.is_authenticated().unwrap());

    session.logout().unwrap();
    assert!(session.current().unwrap().is_none());

    // A second logout is fine
    session.logout().unwrap();
}
