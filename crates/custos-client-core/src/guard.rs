//! Gate for rendering a protected view.
//!
//! The guard produces a decision value; actually rendering the loading
//! placeholder, the login redirect or the denial screen is the embedding
//! UI's concern. A caller only ever receives [`RouteAccess::Granted`] when
//! the protected content may be shown.

use custos_shared::{
    errors::NotLoggedInError,
    uac::{granted_of, AccessMode, Permission, PermissionsError, Principal},
};

use crate::session::{SessionState, SessionStore};

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// The session has not settled yet, show a loading placeholder
    Loading,
    /// Nobody is logged in, redirect to the login entry point (the current
    /// location is not preserved)
    RedirectToLogin,
    /// The principal is known but lacks rights. `missing` lists the required
    /// permissions that are absent, for the denial screen.
    Denied { missing: Vec<Permission> },
    Granted,
}

impl RouteAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Human readable labels of the missing permissions, empty unless denied
    pub fn denial_labels(&self) -> Vec<String> {
        match self {
            Self::Denied { missing } => missing.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Converts the decision into an error for call sites that insist on
    /// access instead of rendering an alternative view
    pub fn require(self) -> anyhow::Result<()> {
        match self {
            Self::Granted => Ok(()),
            Self::Denied { missing } => Err(PermissionsError::MissingPermissions(missing).into()),
            Self::Loading | Self::RedirectToLogin => Err(NotLoggedInError.into()),
        }
    }
}

/// Pure decision function behind [`SessionStore::check_route`]
pub fn decide(
    state: SessionState,
    principal: Option<&Principal>,
    required: &[Permission],
    mode: AccessMode,
) -> RouteAccess {
    match state {
        SessionState::LoggingIn => RouteAccess::Loading,
        SessionState::Anonymous => RouteAccess::RedirectToLogin,
        SessionState::Authenticated => {
            let granted = granted_of(principal);
            if granted.is_authorized(required, mode) {
                RouteAccess::Granted
            } else {
                RouteAccess::Denied {
                    missing: granted.missing_from(required),
                }
            }
        }
    }
}

impl SessionStore {
    /// Decides access for a protected route from the current session snapshot
    #[tracing::instrument(skip(self))]
    pub fn check_route(&self, required: &[Permission], mode: AccessMode) -> RouteAccess {
        decide(self.state(), self.principal().as_deref(), required, mode)
    }
}
