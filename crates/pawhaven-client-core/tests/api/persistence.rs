use crate::helpers::spawn_app;
use pawhaven_client_core::{Client, FileStore, MemoryStore, SessionContext};
use pawhaven_shared::uac::{Role, RoleSet};
use pawhaven_test_backend::TestUser;
use uuid::Uuid;

#[tokio::test]
async fn session_survives_reload() {
    // Arrange
    let app = spawn_app(TestUser::generate(21, &["Admin", "Donor"])).await;
    let outcome = app.login().await.unwrap();

    // Act
    let reloaded = app.rehydrated_session();

    // Assert
    let identity = reloaded.identity().unwrap();
    assert_eq!(identity, &outcome.identity);
    assert_eq!(*reloaded.roles(), RoleSet::from([Role::Admin, Role::Donor]));
}

#[tokio::test]
async fn login_completes_when_storage_rejects_writes() {
    // Arrange
    let store = MemoryStore::new();
    store.reject_writes(true);
    let app = spawn_app(TestUser::generate(22, &["Admin"])).await;
    let client = Client::new(app.backend.address.clone(), SessionContext::new(store.clone()));

    // Act
    let outcome = client
        .login(app.test_user.login_args(), crate::helpers::no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(client.session().is_persistence_degraded());
    assert!(client.is_logged_in());
    assert_eq!(
        client.session().current().identity(),
        Some(&outcome.identity)
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn file_store_session_survives_new_client() {
    // Arrange
    let path = std::env::temp_dir().join(format!("pawhaven-session-{}.json", Uuid::new_v4()));
    let app = spawn_app(TestUser::generate(23, &["Volunteer"])).await;
    let client = Client::new(
        app.backend.address.clone(),
        SessionContext::new(FileStore::new(&path)),
    );
    let outcome = client
        .login(app.test_user.login_args(), crate::helpers::no_cb)
        .await
        .unwrap()
        .unwrap();

    // Act
    let restarted = SessionContext::new(FileStore::new(&path));

    // Assert
    assert_eq!(restarted.current().identity(), Some(&outcome.identity));
    restarted.clear();
    assert!(SessionContext::new(FileStore::new(&path))
        .current()
        .is_anonymous());
    let _ = std::fs::remove_file(path);
}
