use std::fmt::Display;

use crate::{errors::ConversionError, id::DbId};

use super::Permissions;

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
/// Represents a login name and is constrained to not be an empty string
pub struct Username(String);

#[derive(Default, Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositionName(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositionCode(String);

impl Username {
    pub const MAX_LENGTH: usize = 30;
}

impl DisplayName {
    pub const MAX_LENGTH: usize = 50;
}

impl PositionName {
    pub const MAX_LENGTH: usize = 50;
}

impl PositionCode {
    pub const MAX_LENGTH: usize = 16;
}

macro_rules! impl_bounded_string {
    ($name:ident, $allow_empty:expr) => {
        impl TryFrom<String> for $name {
            type Error = ConversionError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if !$allow_empty && value.is_empty() {
                    return Err(ConversionError::Empty);
                }
                if value.len() > Self::MAX_LENGTH {
                    return Err(ConversionError::MaxExceeded {
                        max: Self::MAX_LENGTH,
                        actual: value.len(),
                    });
                }
                Ok(Self(value))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ConversionError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.to_string().try_into()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_bounded_string!(Username, false);
impl_bounded_string!(DisplayName, false);
impl_bounded_string!(PositionName, false);
impl_bounded_string!(PositionCode, true);

/// Lifecycle flag on a principal record. An inactive principal can still hold
/// a session; deactivation is enforced by the identity provider at login.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalStatus {
    Active,
    Inactive,
}

/// An organizational role. Its permission set is the sole input to every
/// access decision made by this core.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: DbId,
    pub name: PositionName,
    pub code: PositionCode,
    /// Used only for display and sorting on management pages
    pub level: u8,
    pub permissions: Permissions,
}

/// The authenticated user record returned on login and by the current-user
/// endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: DbId,
    pub username: Username,
    pub display_name: DisplayName,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Absent means the principal has no elevated permissions
    #[serde(default)]
    pub position: Option<Position>,
    /// Scoping reference used by pages to default-scope their own queries,
    /// not enforced by this core
    #[serde(default)]
    pub unit_id: Option<DbId>,
    #[serde(default)]
    pub department_id: Option<DbId>,
    pub status: PrincipalStatus,
}

impl Principal {
    /// The permission set this principal brings to access decisions, empty
    /// when no position is assigned
    pub fn granted(&self) -> Permissions {
        self.position
            .as_ref()
            .map(|position| position.permissions.clone())
            .unwrap_or_default()
    }
}

/// Degrades a missing principal to an empty granted set instead of an error
pub fn granted_of(principal: Option<&Principal>) -> Permissions {
    principal.map(Principal::granted).unwrap_or_default()
}
