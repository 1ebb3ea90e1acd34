/// Errors the backend reports on authentication. The console deliberately
/// does not distinguish between them when showing a failed login
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid Email or Password")]
    InvalidEmailOrPassword,
    #[error("Missing or invalid bearer token")]
    InvalidToken,
}
