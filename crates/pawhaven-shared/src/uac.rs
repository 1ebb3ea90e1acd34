//! Shared items related to user account control

mod errors;
mod responses;
mod role;
mod routes;
mod user;

pub use errors::AuthError;
pub use responses::{LoginData, LoginResponse, RolesResponse, ShelterResponse, UserSummary};
pub use role::{Role, RoleSet};
pub use routes::{
    default_route_requirements, get_route_requirement, init_route_requirements_to_defaults,
    try_set_route_requirements, RouteRequirement, RouteRequirementMap,
};
pub use user::Username;
