use std::sync::OnceLock;

use crate::const_config::route::*;

use super::{Role, RoleSet};

/// Roles that grant access to a protected route. Holding any one of them is
/// enough
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    roles: RoleSet,
}

impl RouteRequirement {
    pub fn any_of<R: Into<RoleSet>>(roles: R) -> Self {
        Self {
            roles: roles.into(),
        }
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// The single decision function used for every authorization check
    ///
    /// Grants iff the held roles share at least one role with the
    /// requirement. An empty requirement therefore grants no one.
    pub fn is_satisfied_by(&self, held: &RoleSet) -> bool {
        held.intersects(&self.roles)
    }
}

/// Route prefixes and the requirement they are protected by
pub type RouteRequirementMap = Vec<(&'static str, RouteRequirement)>;

static ROUTE_REQUIREMENTS: OnceLock<RouteRequirementMap> = OnceLock::new();

pub fn default_route_requirements() -> RouteRequirementMap {
    vec![
        (ROUTE_PREFIX_ADMIN, RouteRequirement::any_of([Role::Admin])),
        (
            ROUTE_PREFIX_SHELTER,
            RouteRequirement::any_of([Role::ShelterStaff]),
        ),
        (
            ROUTE_PREFIX_DONATION_HISTORY,
            RouteRequirement::any_of([Role::Donor]),
        ),
        (
            ROUTE_PREFIX_VOLUNTEER,
            RouteRequirement::any_of([Role::Volunteer]),
        ),
        (
            ROUTE_PREFIX_ADOPTION_FORMS,
            RouteRequirement::any_of([Role::Adopter]),
        ),
    ]
}

/// Only sets the requirements if they haven't already been set
pub fn try_set_route_requirements(value: RouteRequirementMap) -> Result<(), RouteRequirementMap> {
    ROUTE_REQUIREMENTS.set(value)
}

/// Initializes the requirements, may be run more than once without issue
/// (will only have an effect the first time)
pub fn init_route_requirements_to_defaults() {
    // Set requirements and ignore if they were already set
    let _ = try_set_route_requirements(default_route_requirements());
}

/// Returns the requirement protecting `path` or `None` if the route is public
///
/// The longest registered prefix that matches on a segment boundary wins. If
/// nothing has been registered yet the defaults are used
#[tracing::instrument(ret)]
pub fn get_route_requirement(path: &str) -> Option<&'static RouteRequirement> {
    let map = ROUTE_REQUIREMENTS.get_or_init(default_route_requirements);
    lookup(map, path)
}

fn lookup<'a>(map: &'a RouteRequirementMap, path: &str) -> Option<&'a RouteRequirement> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    map.iter()
        .filter(|(prefix, _)| is_prefix_on_segment(prefix, path))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, requirement)| requirement)
}

fn is_prefix_on_segment(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
