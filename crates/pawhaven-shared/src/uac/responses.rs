use crate::{
    id::{ShelterId, UserId},
    token::AuthToken,
};

/// Body returned by the login endpoint. A missing `data` is a failed login
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub data: Option<LoginData>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginData {
    pub user: UserSummary,
    pub token: AuthToken,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
}

/// Role names as returned by the backend, may be absent or empty
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RolesResponse {
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ShelterResponse {
    pub id: ShelterId,
}
