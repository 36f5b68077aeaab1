use super::Permission;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid User or Password")]
    InvalidUserOrPassword,
    #[error("User Locked Out")]
    LockedOut,
    #[error("User Not Enabled")]
    NotEnabled,
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ChangePasswordError {
    #[error("You entered two different new passwords - the field values must match.")]
    PasswordsDoNotMatch,
    #[error("Current password validation failed: {0}")]
    CurrentPasswordWrong(#[from] AuthError),
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

/// Authorization denial is a first class negative result, not an exception.
/// It only becomes an error at the point a caller insists on access.
#[derive(thiserror::Error, Debug)]
pub enum PermissionsError {
    #[error("the following permissions are missing to access this resource: {0:?}")]
    MissingPermissions(Vec<Permission>),
}
