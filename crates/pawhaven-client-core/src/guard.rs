//! Per navigation authorization decisions

use pawhaven_shared::{
    const_config::route::{
        ROUTE_ADMIN_DASHBOARD, ROUTE_HOME, ROUTE_LOGIN, ROUTE_SHELTER_DASHBOARD,
    },
    uac::{get_route_requirement, Role, RoleSet, RouteRequirement},
};

use crate::session::Session;

/// The one authorization decision, shared by the route guard and the layout
/// gates. Anonymous sessions hold no roles so never satisfy a requirement
pub fn authorize(session: &Session, requirement: &RouteRequirement) -> bool {
    requirement.is_satisfied_by(session.roles())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Grant,
    RedirectToLogin,
}

impl GuardDecision {
    /// Where to navigate instead of the requested route, if anywhere
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Grant => None,
            GuardDecision::RedirectToLogin => Some(ROUTE_LOGIN),
        }
    }

    /// Returns `true` if the guard decision is [`Grant`].
    ///
    /// [`Grant`]: GuardDecision::Grant
    #[must_use]
    pub fn is_grant(&self) -> bool {
        matches!(self, Self::Grant)
    }
}

/// Pure check over already resolved state, no network calls are made
///
/// The requested path is not remembered for after login
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn check(requirement: &RouteRequirement, session: &Session) -> GuardDecision {
        if authorize(session, requirement) {
            GuardDecision::Grant
        } else {
            GuardDecision::RedirectToLogin
        }
    }

    /// Looks up the requirement registered for `path`, unprotected routes are
    /// always granted
    #[tracing::instrument(ret, skip(session))]
    pub fn check_path(path: &str, session: &Session) -> GuardDecision {
        match get_route_requirement(path) {
            Some(requirement) => Self::check(requirement, session),
            None => GuardDecision::Grant,
        }
    }
}

/// Default destination after login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingRoute {
    AdminDashboard,
    ShelterDashboard,
    Home,
}

impl LandingRoute {
    /// First match in the order Admin, ShelterStaff, anything else
    pub fn for_roles(roles: &RoleSet) -> Self {
        if roles.contains(Role::Admin) {
            Self::AdminDashboard
        } else if roles.contains(Role::ShelterStaff) {
            Self::ShelterDashboard
        } else {
            Self::Home
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            LandingRoute::AdminDashboard => ROUTE_ADMIN_DASHBOARD,
            LandingRoute::ShelterDashboard => ROUTE_SHELTER_DASHBOARD,
            LandingRoute::Home => ROUTE_HOME,
        }
    }
}
