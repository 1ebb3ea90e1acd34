use pawhaven_shared::{
    const_config::storage_key::*,
    id::{ShelterId, UserId},
    token::{AuthToken, DisplayHint},
    uac::{RoleSet, Username},
};
use tracing::warn;

use super::{identity::AuthoritativeRoles, Identity, SessionStore};
use crate::errors::{SnapshotError, StoreError};

/// The persisted form of an [`Identity`]
///
/// The display hint is derived from the token and so is recomputed on read
/// instead of trusted from storage (the `role` key is still written for other
/// readers of the store)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    token: AuthToken,
    user_id: UserId,
    username: Username,
    role_hint: Option<String>,
    roles: RoleSet,
    shelter_id: Option<ShelterId>,
}

impl SessionSnapshot {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            token: identity.token().clone(),
            user_id: identity.user_id(),
            username: identity.username().clone(),
            role_hint: identity.display_hint().role.clone(),
            roles: identity.roles().as_role_set().clone(),
            shelter_id: identity.shelter_id(),
        }
    }

    pub fn into_identity(self) -> Identity {
        let display_hint = self
            .token
            .decode_display_hint()
            .unwrap_or_else(|_| DisplayHint {
                username: None,
                role: self.role_hint,
            });
        Identity::new(self.user_id, self.username, self.token, display_hint)
            .with_authorization(AuthoritativeRoles::new(self.roles), self.shelter_id)
    }

    /// Writes every key, removing the shelter id key if there is none
    pub fn write_to(&self, store: &mut dyn SessionStore) -> Result<(), StoreError> {
        store.set(STORAGE_KEY_TOKEN, self.token.as_str())?;
        store.set(STORAGE_KEY_USER_ID, &self.user_id.to_string())?;
        store.set(STORAGE_KEY_USERNAME, self.username.as_ref())?;
        match &self.role_hint {
            Some(role) => store.set(STORAGE_KEY_ROLE_HINT, role)?,
            None => store.remove(STORAGE_KEY_ROLE_HINT)?,
        }
        store.set(STORAGE_KEY_USER_ROLES, &serde_json::to_string(&self.roles)?)?;
        match self.shelter_id {
            Some(id) => store.set(STORAGE_KEY_SHELTER_ID, &id.to_string())?,
            None => store.remove(STORAGE_KEY_SHELTER_ID)?,
        }
        Ok(())
    }

    /// Reads a snapshot back. No token means no session
    pub fn read_from(store: &dyn SessionStore) -> Result<Option<Self>, SnapshotError> {
        let Some(token) = store.get(STORAGE_KEY_TOKEN)? else {
            return Ok(None);
        };
        if token.is_empty() {
            return Err(SnapshotError::Malformed {
                key: STORAGE_KEY_TOKEN,
                reason: "empty token".into(),
            });
        }

        let user_id = store
            .get(STORAGE_KEY_USER_ID)?
            .ok_or(SnapshotError::MissingKey {
                key: STORAGE_KEY_USER_ID,
            })?
            .parse::<UserId>()
            .map_err(|e| SnapshotError::Malformed {
                key: STORAGE_KEY_USER_ID,
                reason: e.to_string(),
            })?;

        let username = store
            .get(STORAGE_KEY_USERNAME)?
            .ok_or(SnapshotError::MissingKey {
                key: STORAGE_KEY_USERNAME,
            })
            .and_then(|raw| {
                Username::try_from(raw).map_err(|e| SnapshotError::Malformed {
                    key: STORAGE_KEY_USERNAME,
                    reason: e.to_string(),
                })
            })?;

        let roles = match store.get(STORAGE_KEY_USER_ROLES)? {
            Some(raw) => {
                let names: Vec<String> =
                    serde_json::from_str(&raw).map_err(|e| SnapshotError::Malformed {
                        key: STORAGE_KEY_USER_ROLES,
                        reason: e.to_string(),
                    })?;
                RoleSet::from_names(names)
            }
            None => RoleSet::new(),
        };

        let shelter_id = match store.get(STORAGE_KEY_SHELTER_ID)? {
            Some(raw) => match raw.parse::<ShelterId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    // Not worth losing the session over, the affiliation is
                    // allowed to be unknown
                    warn!(?e, ?raw, "ignoring malformed persisted shelter id");
                    None
                }
            },
            None => None,
        };

        Ok(Some(Self {
            token: token.into(),
            user_id,
            username,
            role_hint: store.get(STORAGE_KEY_ROLE_HINT)?,
            roles,
            shelter_id,
        }))
    }

    /// Attempts to remove every key even if some removals fail, the first
    /// failure is returned
    pub fn clear(store: &mut dyn SessionStore) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in STORAGE_KEYS_ALL {
            if let Err(e) = store.remove(key) {
                warn!(?e, key, "failed to remove persisted session key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
