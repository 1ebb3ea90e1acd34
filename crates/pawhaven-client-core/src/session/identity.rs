use std::{ops::Deref, sync::Arc};

use pawhaven_shared::{
    id::{ShelterId, UserId},
    token::{AuthToken, DisplayHint},
    uac::{Role, RoleSet, Username},
};
use tracing::warn;

/// Roles that came from the role service (or a snapshot of a previous
/// resolution). This is the only role data authorization decisions may use.
///
/// Cannot be built from a [`DisplayHint`], only the resolver and the
/// persisted snapshot create values of this type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritativeRoles(RoleSet);

impl AuthoritativeRoles {
    pub(crate) fn new(roles: RoleSet) -> Self {
        Self(roles)
    }

    pub fn as_role_set(&self) -> &RoleSet {
        &self.0
    }
}

impl Deref for AuthoritativeRoles {
    type Target = RoleSet;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    username: Username,
    roles: AuthoritativeRoles,
    shelter_id: Option<ShelterId>,
    token: AuthToken,
    display_hint: DisplayHint,
}

impl Identity {
    /// Identity straight after credential exchange, no roles until they have
    /// been resolved
    pub(crate) fn new(
        user_id: UserId,
        username: Username,
        token: AuthToken,
        display_hint: DisplayHint,
    ) -> Self {
        Self {
            user_id,
            username,
            roles: AuthoritativeRoles::default(),
            shelter_id: None,
            token,
            display_hint,
        }
    }

    /// Replaces the authorization data keeping everything else
    pub(crate) fn with_authorization(
        &self,
        roles: AuthoritativeRoles,
        shelter_id: Option<ShelterId>,
    ) -> Self {
        let mut result = self.clone();
        result.roles = roles;
        result.shelter_id = shelter_id;
        result.enforce_shelter_invariant();
        result
    }

    /// A shelter id is only meaningful for shelter staff
    fn enforce_shelter_invariant(&mut self) {
        if self.shelter_id.is_some() && !self.roles.contains(Role::ShelterStaff) {
            warn!(
                user_id = %self.user_id,
                "dropping shelter id for user without the ShelterStaff role"
            );
            self.shelter_id = None;
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn roles(&self) -> &AuthoritativeRoles {
        &self.roles
    }

    pub fn shelter_id(&self) -> Option<ShelterId> {
        self.shelter_id
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn display_hint(&self) -> &DisplayHint {
        &self.display_hint
    }

    /// Shelter staff whose affiliation could not be looked up. Still counts as
    /// shelter staff for authorization purposes
    pub fn is_unassigned_shelter_staff(&self) -> bool {
        self.roles.contains(Role::ShelterStaff) && self.shelter_id.is_none()
    }
}

/// The current session, either nobody or exactly one identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Arc<Identity>),
}

impl Session {
    pub fn identity(&self) -> Option<&Arc<Identity>> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }

    /// Roles held by the session, always empty for anonymous sessions
    pub fn roles(&self) -> &RoleSet {
        static NO_ROLES: RoleSet = RoleSet::EMPTY;
        match self {
            Session::Anonymous => &NO_ROLES,
            Session::Authenticated(identity) => identity.roles().as_role_set(),
        }
    }

    /// Returns `true` if the session is [`Anonymous`].
    ///
    /// [`Anonymous`]: Session::Anonymous
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}
