use crate::helpers::{no_cb, spawn_app};
use pawhaven_client_core::LoginError;
use pawhaven_test_backend::TestUser;
use std::time::Duration;

#[tokio::test]
async fn logout_clears_every_persisted_key() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["ShelterStaff"])).await;
    app.login().await.unwrap();
    assert!(!app.store.is_empty());

    // Act
    let target = app.client.logout();

    // Assert
    assert_eq!(target, "/");
    assert!(app.store.is_empty(), "{:?}", app.store.dump());
    assert!(app.client.session().current().is_anonymous());
    assert!(app.rehydrated_session().is_anonymous());
}

#[tokio::test]
async fn double_logout() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Admin"])).await;
    app.login().await.unwrap();

    // Act
    app.client.logout();
    let first_is_empty = app.store.is_empty();
    app.client.logout();

    // Assert
    assert!(first_is_empty);
    assert!(app.store.is_empty());
    assert!(!app.client.is_logged_in());
}

#[tokio::test]
async fn logout_does_not_contact_backend() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &["Admin"])).await;
    app.login().await.unwrap();
    let request_count = app.backend.recorded_requests().len();

    // Act
    app.client.logout();

    // Assert
    assert_eq!(app.backend.recorded_requests().len(), request_count);
}

#[tokio::test]
async fn logout_during_role_fetch_is_final() {
    // Arrange
    let app = spawn_app(
        TestUser::generate(1, &["Admin"]).with_roles_delay(Duration::from_millis(500)),
    )
    .await;

    // Act
    let rx = app.client.login(app.test_user.login_args(), no_cb);
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.client.logout();
    let outcome = rx.await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err(), LoginError::Superseded);
    assert!(app.client.session().current().is_anonymous());
    assert!(app.store.is_empty(), "{:?}", app.store.dump());
}
