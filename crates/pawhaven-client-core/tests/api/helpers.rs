use pawhaven_client_core::{
    Client, ClientError, LoginError, LoginOutcome, MemoryStore, Session, SessionContext,
};
use pawhaven_test_backend::{TestBackend, TestUser};
use std::fmt::Debug;

pub use pawhaven_test_backend::no_cb;

/// A client wired to a fake backend, persisting into a store the test can
/// inspect
pub struct TestApp {
    pub backend: TestBackend,
    pub client: Client,
    pub store: MemoryStore,
    pub test_user: TestUser,
}

impl Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.backend.address)
            .field("test_user", &self.test_user)
            .finish()
    }
}

/// Spawns a backend that knows only `test_user`
pub async fn spawn_app(test_user: TestUser) -> TestApp {
    spawn_app_with_users(test_user, vec![]).await
}

pub async fn spawn_app_with_users(test_user: TestUser, others: Vec<TestUser>) -> TestApp {
    let mut users = vec![test_user.clone()];
    users.extend(others);
    let backend = TestBackend::spawn(users).await;
    let store = MemoryStore::new();
    let client = Client::new(backend.address.clone(), SessionContext::new(store.clone()));
    TestApp {
        backend,
        client,
        store,
        test_user,
    }
}

impl TestApp {
    pub async fn login(&self) -> Result<LoginOutcome, LoginError> {
        self.login_as(&self.test_user).await
    }

    pub async fn login_as(&self, user: &TestUser) -> Result<LoginOutcome, LoginError> {
        self.client
            .login(user.login_args(), no_cb)
            .await
            .expect("failed to receive on rx")
    }

    pub async fn fetch_pets(&self, path: &str) -> Result<serde_json::Value, ClientError> {
        self.client
            .fetch_protected(path, no_cb)
            .await
            .expect("failed to receive on rx")
    }

    /// What a fresh page load would see
    pub fn rehydrated_session(&self) -> Session {
        SessionContext::new(self.store.clone()).current()
    }
}
