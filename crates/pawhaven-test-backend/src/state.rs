use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Mutex,
};
use uuid::Uuid;

use crate::scenario::{LoginBehavior, RolesBehavior, TestUser};

/// A request as seen by the fake backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug)]
pub(crate) struct BackendState {
    users: Mutex<Vec<TestUser>>,
    /// Token to the id of the user it was issued to
    issued_tokens: Mutex<BTreeMap<String, u64>>,
    revoked_tokens: Mutex<BTreeSet<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl BackendState {
    pub(crate) fn new(users: Vec<TestUser>) -> Self {
        Self {
            users: Mutex::new(users),
            issued_tokens: Default::default(),
            revoked_tokens: Default::default(),
            requests: Default::default(),
        }
    }

    pub(crate) fn find_by_credentials(&self, email: &str, password: &str) -> Option<TestUser> {
        self.users
            .lock()
            .expect("mutex poisoned")
            .iter()
            .find(|x| x.email == email && x.password == password)
            .cloned()
    }

    pub(crate) fn find_by_id(&self, id: u64) -> Option<TestUser> {
        self.users
            .lock()
            .expect("mutex poisoned")
            .iter()
            .find(|x| x.id == id)
            .cloned()
    }

    pub(crate) fn update_user<F: FnOnce(&mut TestUser)>(&self, id: u64, f: F) {
        let mut guard = self.users.lock().expect("mutex poisoned");
        let user = guard
            .iter_mut()
            .find(|x| x.id == id)
            .expect("no test user with that id");
        f(user);
    }

    /// Issues the token for a user according to their login behavior
    pub(crate) fn issue_token(&self, user: &TestUser) -> String {
        let token = match &user.login {
            LoginBehavior::FixedToken(token) => token.clone(),
            LoginBehavior::EmptyToken => return String::new(),
            LoginBehavior::Normal | LoginBehavior::MissingData => mint_token(user),
        };
        self.issued_tokens
            .lock()
            .expect("mutex poisoned")
            .insert(token.clone(), user.id);
        token
    }

    /// Returns the id of the user the bearer token in `header` belongs to if
    /// the token is still valid
    pub(crate) fn authenticate(&self, header: Option<&str>) -> Option<u64> {
        let token = header?.strip_prefix("Bearer ")?;
        if self
            .revoked_tokens
            .lock()
            .expect("mutex poisoned")
            .contains(token)
        {
            return None;
        }
        self.issued_tokens
            .lock()
            .expect("mutex poisoned")
            .get(token)
            .copied()
    }

    pub(crate) fn revoke_all_tokens(&self) {
        let issued = self.issued_tokens.lock().expect("mutex poisoned");
        self.revoked_tokens
            .lock()
            .expect("mutex poisoned")
            .extend(issued.keys().cloned());
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.requests.lock().expect("mutex poisoned").push(request);
    }

    pub(crate) fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mutex poisoned").clone()
    }
}

/// Builds an unsigned token shaped like the ones the real backend hands out
fn mint_token(user: &TestUser) -> String {
    let header = serde_json::json!({"alg": "none", "typ": "JWT"});
    let roles = match &user.roles {
        RolesBehavior::Roles(roles) => serde_json::json!(roles),
        _ => serde_json::Value::Null,
    };
    let claims = serde_json::json!({
        "nameid": user.id.to_string(),
        "unique_name": user.username,
        "role": roles,
        "jti": Uuid::new_v4().to_string(),
    });
    format!(
        "{}.{}.unsigned",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}
