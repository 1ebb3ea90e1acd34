//! This module stores the expected format of the arguments for the requests

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

use crate::errors::ConversionError;

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub email: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(email: S, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }

    /// Both fields are required to be non-empty before a request is sent
    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.email.trim().is_empty() || self.password.expose_secret().is_empty() {
            return Err(ConversionError::Empty);
        }
        Ok(())
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}
