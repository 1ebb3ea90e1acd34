use pawhaven_shared::{const_config::route::ROUTE_LOGIN, errors::NotLoggedInError};

/// Failure of a login attempt as shown to the user
///
/// Wrong credentials and an unreachable backend are intentionally reported the
/// same way, the details only go to the logs
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Login failed. Please check your details and try again")]
    LoginFailed,
    #[error("Email and password are both required")]
    InvalidInput,
    #[error("Login was superseded by a newer login or a logout")]
    Superseded,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Session expired, please log in again")]
    SessionExpired,
    #[error(transparent)]
    NotLoggedIn(#[from] NotLoggedInError),
    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

impl ClientError {
    /// Route the user should be sent to because of this error (if any)
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            ClientError::SessionExpired | ClientError::NotLoggedIn(_) => Some(ROUTE_LOGIN),
            ClientError::Request(_) => None,
        }
    }

    /// Returns `true` if the client error is [`SessionExpired`].
    ///
    /// [`SessionExpired`]: ClientError::SessionExpired
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage is not available: {0}")]
    Unavailable(String),
    #[error("storage rejected the write for key {key:?}")]
    WriteRejected { key: String },
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Persisted session data that cannot be turned back into an identity
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("persisted value for {key:?} is missing")]
    MissingKey { key: &'static str },
    #[error("persisted value for {key:?} is malformed: {reason}")]
    Malformed { key: &'static str, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
