//! This module stores the expected format of the arguments for the requests
//! to the identity provider. The struct names map to the endpoint paths in
//! [`crate::const_config::path`].

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[derive(Clone)]
pub struct ChangePasswordReqArgs {
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub new_password_check: SecretString,
}

impl Debug for ChangePasswordReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordReqArgs")
            .finish_non_exhaustive()
    }
}
