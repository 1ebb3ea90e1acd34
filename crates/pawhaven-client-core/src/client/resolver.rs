use anyhow::{bail, Context as _};
use pawhaven_shared::{
    const_config::path::{PATH_SHELTER_FOR_USER, PATH_USER_ROLES},
    id::{ShelterId, UserId},
    token::AuthToken,
    uac::{Role, RoleSet, RolesResponse, ShelterResponse},
};
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use super::{extract_response, handle_error, Client};
use crate::session::{AuthoritativeRoles, Identity};

/// How the role lookup went. Every variant allows the login to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleResolution {
    Resolved,
    /// The backend answered but the user has no roles
    NoRolesAssigned,
    /// The lookup itself failed (including not found)
    FetchFailed,
}

/// Result of resolving a user's roles and shelter affiliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub roles: AuthoritativeRoles,
    pub shelter_id: Option<ShelterId>,
    pub role_resolution: RoleResolution,
}

impl Authorization {
    pub fn apply_to(&self, identity: &Identity) -> Identity {
        identity.with_authorization(self.roles.clone(), self.shelter_id)
    }
}

/// Looks up the authoritative roles (and for shelter staff the shelter) of a
/// user
///
/// Never fails, problems degrade to fewer roles or no shelter id
#[derive(Debug)]
pub struct AuthorizationResolver<'a> {
    client: &'a Client,
}

impl<'a> AuthorizationResolver<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self, token))]
    pub async fn resolve(&self, user_id: UserId, token: &AuthToken) -> Authorization {
        let response = self
            .client
            .build_request(
                PATH_USER_ROLES.method.clone(),
                &PATH_USER_ROLES.with_segment(user_id),
                Some(token),
            )
            .send()
            .await;
        self.resolve_from_roles_response(response, user_id, token)
            .await
    }

    /// Continues resolution once the role request has been answered
    pub(crate) async fn resolve_from_roles_response(
        &self,
        response: reqwest::Result<reqwest::Response>,
        user_id: UserId,
        token: &AuthToken,
    ) -> Authorization {
        let (roles, role_resolution) = match roles_from_response(response).await {
            Ok(roles) if roles.is_empty() => {
                info!(%user_id, "no roles assigned");
                (roles, RoleResolution::NoRolesAssigned)
            }
            Ok(roles) => (roles, RoleResolution::Resolved),
            Err(e) => {
                warn!(?e, %user_id, "failed to fetch roles, continuing without roles");
                (RoleSet::new(), RoleResolution::FetchFailed)
            }
        };

        let shelter_id = if roles.contains(Role::ShelterStaff) {
            match self.fetch_shelter(user_id, token).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(?e, %user_id, "failed to look up shelter, continuing unassigned");
                    None
                }
            }
        } else {
            None
        };

        Authorization {
            roles: AuthoritativeRoles::new(roles),
            shelter_id,
            role_resolution,
        }
    }

    async fn fetch_shelter(&self, user_id: UserId, token: &AuthToken) -> anyhow::Result<ShelterId> {
        let response = self
            .client
            .build_request(
                PATH_SHELTER_FOR_USER.method.clone(),
                &PATH_SHELTER_FOR_USER.with_segment(user_id),
                Some(token),
            )
            .send()
            .await;
        let (response, status) = extract_response(response)?;
        if status != StatusCode::OK {
            return Err(handle_error(response).await);
        }
        let body: ShelterResponse = response
            .json()
            .await
            .context("failed to parse shelter as json")?;
        Ok(body.id)
    }
}

async fn roles_from_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<RoleSet> {
    let (response, status) = extract_response(response)?;
    if status == StatusCode::NOT_FOUND {
        bail!("no role record found for user");
    }
    if status != StatusCode::OK {
        return Err(handle_error(response).await);
    }
    let body: RolesResponse = response
        .json()
        .await
        .context("failed to parse roles as json")?;
    Ok(RoleSet::from_names(body.roles.unwrap_or_default()))
}
