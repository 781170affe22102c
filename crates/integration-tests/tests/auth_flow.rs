//! Registration, login, and profile update flows.

#![allow(clippy::unwrap_used)]

use greenbasket_integration_tests::test_pool;
use greenbasket_server::services::auth::{AuthError, AuthService};

#[tokio::test]
async fn register_then_login() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let registered = auth
        .register("alice", "hunter2", "hunter2", "Alice")
        .await
        .unwrap();
    assert!(!registered.is_admin);
    assert_eq!(registered.username.as_str(), "alice");

    let logged_in = auth.login("alice", "hunter2").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("bob", "correct", "correct", "Bob")
        .await
        .unwrap();

    let err = auth.login("bob", "incorrect").await.unwrap_err();
    assert!(matches!(err, AuthError::IncorrectPassword));

    let err = auth.login("nobody", "whatever").await.unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn register_rejects_mismatched_passwords_and_blank_fields() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let err = auth
        .register("carol", "one", "two", "Carol")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));

    let err = auth.register("", "pw", "pw", "Carol").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("dave", "pw", "pw", "Dave").await.unwrap();
    let err = auth
        .register("dave", "other", "other", "Dave 2")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));
}

#[tokio::test]
async fn profile_update_requires_current_password() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let user = auth.register("erin", "old-pw", "old-pw", "Erin").await.unwrap();

    let err = auth
        .update_profile(user.id, "erin", "wrong-pw", "new-pw", "Erin")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::IncorrectPassword));

    // Old password still works
    auth.login("erin", "old-pw").await.unwrap();

    let updated = auth
        .update_profile(user.id, "erin2", "old-pw", "new-pw", "Erin Updated")
        .await
        .unwrap();
    assert_eq!(updated.username.as_str(), "erin2");
    assert_eq!(updated.name, "Erin Updated");

    auth.login("erin2", "new-pw").await.unwrap();
    let err = auth.login("erin2", "old-pw").await.unwrap_err();
    assert!(matches!(err, AuthError::IncorrectPassword));
}

#[tokio::test]
async fn profile_update_rejects_taken_username() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("frank", "pw", "pw", "Frank").await.unwrap();
    let user = auth.register("grace", "pw", "pw", "Grace").await.unwrap();

    let err = auth
        .update_profile(user.id, "frank", "pw", "pw2", "Grace")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));
}
