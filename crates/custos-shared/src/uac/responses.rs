use crate::token::{AccessToken, RefreshToken};

use super::Principal;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: AccessToken,
    /// Stored but never exchanged by this core (no client side refresh flow)
    pub refresh_token: RefreshToken,
    pub user: Principal,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CurrentUserResponse {
    pub user: Principal,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: String,
}
