use crate::helpers::{no_cb, spawn_app};
use pawhaven_test_backend::TestUser;

#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = spawn_app(TestUser::generate(1, &[])).await;

    // Act
    let actual = app.client.health_check(no_cb).await.unwrap();

    // Assert
    assert!(actual.is_ok(), "{actual:?}");
}

#[tokio::test]
async fn health_check_fails_without_backend() {
    // Arrange
    let client = pawhaven_client_core::Client::new(
        "http://127.0.0.1:1".to_string(),
        pawhaven_client_core::SessionContext::in_memory(),
    );

    // Act
    let actual = client.health_check(no_cb).await.unwrap();

    // Assert
    assert!(actual.is_err());
}
