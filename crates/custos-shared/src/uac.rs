//! Shared items related to user account control

mod errors;
mod permissions;
mod principal;
mod responses;

pub use errors::{AuthError, ChangePasswordError, PermissionsError};
pub use permissions::{AccessMode, Permission, Permissions};
pub use principal::{
    granted_of, DisplayName, Position, PositionCode, PositionName, Principal, PrincipalStatus,
    Username,
};
pub use responses::{ChangePasswordResponse, CurrentUserResponse, LoginResponse};
