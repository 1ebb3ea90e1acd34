//! Bearer token handed out by the backend and the claims embedded in it
//!
//! The client never verifies the token signature, that is the backend's job.
//! Claims are decoded for display purposes only and so are returned as a
//! [`DisplayHint`] which cannot be used for authorization decisions.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::Value;

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value to use for the `Authorization` header
    pub fn bearer_header_value(&self) -> String {
        format!(
            "{}{}",
            crate::const_config::client::CLIENT_BEARER_PREFIX,
            self.0
        )
    }

    /// Decodes the claims section of the token without validating it
    #[tracing::instrument(ret, err(Debug))]
    pub fn decode_display_hint(&self) -> Result<DisplayHint, TokenDecodeError> {
        let mut parts = self.0.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_header), Some(payload), Some(_signature), None) => payload,
            _ => return Err(TokenDecodeError::Format),
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let claims: TokenClaims = serde_json::from_slice(&bytes)?;
        Ok(claims.into_display_hint())
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("len", &self.0.len())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenDecodeError {
    #[error("token is not made up of three dot separated sections")]
    Format,
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims we care about for display. Everything else in the payload is ignored
#[derive(Debug, serde::Deserialize)]
struct TokenClaims {
    #[serde(default, alias = "unique_name", alias = "name")]
    username: Option<String>,
    #[serde(default)]
    role: Option<Value>,
}

/// Token decoded values that are only safe to show to the user
///
/// In particular `role` is deliberately kept as a raw string so that it can't
/// be confused with the roles used for authorization
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayHint {
    pub username: Option<String>,
    pub role: Option<String>,
}

impl TokenClaims {
    fn into_display_hint(self) -> DisplayHint {
        let role = match self.role {
            Some(Value::String(s)) => Some(s),
            Some(Value::Array(values)) => Some(
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Some(other) => Some(other.to_string()),
            None => None,
        };
        DisplayHint {
            username: self.username,
            role,
        }
    }
}
