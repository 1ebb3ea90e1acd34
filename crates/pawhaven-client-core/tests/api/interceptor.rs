use crate::helpers::{no_cb, spawn_app};
use pawhaven_client_core::{ClientError, LoginError};
use pawhaven_shared::req_args::LoginReqArgs;
use pawhaven_test_backend::TestUser;
use std::time::Duration;

#[tokio::test]
async fn protected_fetch_sends_bearer_token() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Donor"])).await;
    let identity = app.login().await.unwrap().identity;

    // Act
    let pets = app.fetch_pets("/pets").await.unwrap();

    // Assert
    assert_eq!(pets.as_array().map(|x| x.len()), Some(2));
    let requests = app.backend.requests_to("/pets");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization,
        Some(format!("Bearer {}", identity.token().as_str()))
    );
}

#[tokio::test]
async fn unauthorized_response_clears_session() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Donor"])).await;
    app.login().await.unwrap();
    app.backend.revoke_all_tokens();

    // Act
    let actual = app.fetch_pets("/pets").await.unwrap_err();

    // Assert
    assert!(actual.is_session_expired(), "{actual:?}");
    assert_eq!(actual.redirect_target(), Some("/login"));
    assert!(!app.client.is_logged_in());
    assert!(app.store.is_empty());
    assert!(app.rehydrated_session().is_anonymous());
}

#[tokio::test]
async fn protected_fetch_without_session_is_not_sent() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Donor"])).await;

    // Act
    let actual = app.fetch_pets("/pets").await.unwrap_err();

    // Assert
    assert!(matches!(actual, ClientError::NotLoggedIn(_)), "{actual:?}");
    assert!(app.backend.requests_to("/pets").is_empty());
}

#[tokio::test]
async fn late_unauthorized_does_not_clear_newer_session() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Donor"])).await;
    app.login().await.unwrap();
    let pending = app
        .client
        .fetch_protected::<serde_json::Value, _>("/pets?slow=1", no_cb);
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.backend.revoke_all_tokens();
    let newer = app.login().await.unwrap();

    // Act
    let actual = pending.await.unwrap().unwrap_err();

    // Assert
    assert!(actual.is_session_expired());
    let current = app.client.session().current();
    assert_eq!(current.identity(), Some(&newer.identity));
    assert!(!app.store.is_empty());
}

#[tokio::test]
async fn failed_relogin_does_not_shield_rejected_session() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Donor"])).await;
    app.login().await.unwrap();
    let pending = app
        .client
        .fetch_protected::<serde_json::Value, _>("/pets?slow=1", no_cb);
    tokio::time::sleep(Duration::from_millis(50)).await;
    app.backend.revoke_all_tokens();
    let failed_login = app
        .client
        .login(
            LoginReqArgs::new("nobody@example.com", "x".to_string().into()),
            no_cb,
        )
        .await
        .unwrap();

    // Act
    let actual = pending.await.unwrap().unwrap_err();

    // Assert
    assert_eq!(failed_login.unwrap_err(), LoginError::LoginFailed);
    assert!(actual.is_session_expired(), "{actual:?}");
    assert!(!app.client.is_logged_in());
    assert!(app.store.is_empty(), "{:?}", app.store.dump());
}
