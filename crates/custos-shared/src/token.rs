//! Opaque credential types issued by the identity provider.
//!
//! The refresh token is stored for completeness of the persisted session but
//! is never exchanged by this core (no client side token-refresh flow).

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccessToken(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(String);

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<String> for RefreshToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<AccessToken> for String {
    fn from(value: AccessToken) -> Self {
        value.0
    }
}

impl From<RefreshToken> for String {
    fn from(value: RefreshToken) -> Self {
        value.0
    }
}
