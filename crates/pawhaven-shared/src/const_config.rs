//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    pub const CLIENT_DEFAULT_BACKEND_ADDRESS: &str = "http://localhost:5000";
    pub const CLIENT_BEARER_PREFIX: &str = "Bearer ";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health_check");
    pub const PATH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    /// Takes the user id as its only segment argument
    pub const PATH_USER_ROLES: PathSpec = PathSpec::get("/userrole/role/{}/roles");
    /// Takes the user id as its only segment argument
    pub const PATH_SHELTER_FOR_USER: PathSpec = PathSpec::get("/shelter/user/{}");
}

/// Client side routes (the pages of the console)
pub mod route {
    pub const ROUTE_LOGIN: &str = "/login";
    pub const ROUTE_HOME: &str = "/";
    pub const ROUTE_ADMIN_DASHBOARD: &str = "/admin/dashboard";
    pub const ROUTE_SHELTER_DASHBOARD: &str = "/shelter/dashboard";

    pub const ROUTE_PREFIX_ADMIN: &str = "/admin";
    pub const ROUTE_PREFIX_SHELTER: &str = "/shelter";
    pub const ROUTE_PREFIX_DONATION_HISTORY: &str = "/donate/history";
    pub const ROUTE_PREFIX_VOLUNTEER: &str = "/volunteer";
    pub const ROUTE_PREFIX_ADOPTION_FORMS: &str = "/adopt/forms";
}

/// Keys used in the persisted session store. All are written and cleared
/// together
pub mod storage_key {
    pub const STORAGE_KEY_TOKEN: &str = "token";
    pub const STORAGE_KEY_USER_ID: &str = "nameid";
    pub const STORAGE_KEY_USERNAME: &str = "username";
    /// Display hint only, never used for authorization
    pub const STORAGE_KEY_ROLE_HINT: &str = "role";
    pub const STORAGE_KEY_USER_ROLES: &str = "userRoles";
    pub const STORAGE_KEY_SHELTER_ID: &str = "shelterID";

    pub const STORAGE_KEYS_ALL: [&str; 6] = [
        STORAGE_KEY_TOKEN,
        STORAGE_KEY_USER_ID,
        STORAGE_KEY_USERNAME,
        STORAGE_KEY_ROLE_HINT,
        STORAGE_KEY_USER_ROLES,
        STORAGE_KEY_SHELTER_ID,
    ];
}
