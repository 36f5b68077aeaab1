//! Single source of truth for "who is logged in".
//!
//! The principal and the access token are only ever written together under
//! one lock so no observer sees one set without the other (both absent is the
//! logged out state). Overlapping refreshes are not serialized, the last
//! write wins; the principal record is server authoritative so that is safe.

use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use custos_shared::{
    errors::NotLoggedInError,
    menu::{filter_menu, MenuItem},
    req_args::{ChangePasswordReqArgs, LoginReqArgs},
    token::{AccessToken, RefreshToken},
    uac::{granted_of, ChangePasswordError, Permissions, Principal},
};
use secrecy::ExposeSecret as _;
use tracing::warn;

use crate::{
    provider::IdentityProvider,
    storage::{PersistedSession, SessionStorage},
};

/// The observable lifecycle of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cold start, [`SessionStore::initialize`] has not settled yet
    LoggingIn,
    Authenticated,
    Anonymous,
}

#[derive(Debug)]
struct SessionInner {
    principal: Option<Arc<Principal>>,
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
    loading: bool,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    storage: Arc<dyn SessionStorage>,
    inner: Arc<Mutex<SessionInner>>,
}

impl SessionStore {
    /// Starts in the `LoggingIn` state; call [`Self::initialize`] to settle it
    pub fn new(provider: Arc<dyn IdentityProvider>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            provider,
            storage,
            inner: Arc::new(Mutex::new(SessionInner {
                principal: None,
                access_token: None,
                refresh_token: None,
                loading: true,
            })),
        }
    }

    pub fn state(&self) -> SessionState {
        let inner = self.inner.lock().expect("mutex poisoned");
        debug_assert_eq!(
            inner.principal.is_some(),
            inner.access_token.is_some(),
            "principal and token must be set and cleared together"
        );
        if inner.loading {
            SessionState::LoggingIn
        } else if inner.principal.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn principal(&self) -> Option<Arc<Principal>> {
        self.inner.lock().expect("mutex poisoned").principal.clone()
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .access_token
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().expect("mutex poisoned").loading
    }

    /// The permission set for access decisions, empty while logged out or
    /// while the principal has no position
    pub fn granted(&self) -> Permissions {
        granted_of(self.principal().as_deref())
    }

    /// The menu subtree visible to the current principal
    pub fn visible_menu(&self, menu: &[MenuItem]) -> Vec<MenuItem> {
        filter_menu(menu, &self.granted())
    }

    /// Settles the cold start state from persisted storage.
    ///
    /// With a persisted token the principal is re-fetched from the identity
    /// provider. If that fails but a persisted principal exists the session
    /// falls back to it (stale but available) so a transient network failure
    /// does not force a logout while the token may still be valid. With no
    /// fallback the session is cleared entirely. Never surfaces an error.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) {
        let Some(persisted) = PersistedSession::load(self.storage.as_ref()) else {
            self.settle_anonymous();
            return;
        };
        match self.provider.fetch_current_user(&persisted.access_token).await {
            Ok(principal) => {
                PersistedSession::store_principal(self.storage.as_ref(), &principal);
                self.commit(
                    Arc::new(principal),
                    persisted.access_token,
                    persisted.refresh_token,
                );
            }
            Err(e) => match persisted.principal {
                Some(principal) => {
                    warn!("failed to re-fetch principal, using persisted fallback: {e:#}");
                    self.commit(
                        Arc::new(principal),
                        persisted.access_token,
                        persisted.refresh_token,
                    );
                }
                None => {
                    warn!("failed to re-fetch principal and no fallback exists, logging out: {e:#}");
                    PersistedSession::clear(self.storage.as_ref());
                    self.settle_anonymous();
                }
            },
        }
    }

    /// Authenticates against the identity provider. On success the principal
    /// and tokens are stored atomically and persisted; on failure session
    /// state is left untouched and the error message is suitable for direct
    /// display.
    #[tracing::instrument(skip(self, args))]
    pub async fn login(&self, args: LoginReqArgs) -> anyhow::Result<Arc<Principal>> {
        let response = self.provider.login(args).await.context("login failed")?;
        PersistedSession::store_login(self.storage.as_ref(), &response);
        let principal = Arc::new(response.user);
        self.commit(
            principal.clone(),
            response.access_token,
            Some(response.refresh_token),
        );
        Ok(principal)
    }

    /// Clears the session and the persisted storage. Safe to call when
    /// already logged out.
    #[tracing::instrument(skip(self))]
    pub fn logout(&self) {
        PersistedSession::clear(self.storage.as_ref());
        self.settle_anonymous();
    }

    /// Replaces the stored principal after a profile affecting action and
    /// re-persists it; the tokens are not touched. Ignored while logged out
    /// (there is no token to pair the principal with).
    #[tracing::instrument(skip(self, principal))]
    pub fn update_principal(&self, principal: Principal) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        if inner.access_token.is_none() {
            warn!("ignoring principal update while logged out");
            return;
        }
        PersistedSession::store_principal(self.storage.as_ref(), &principal);
        inner.principal = Some(Arc::new(principal));
    }

    /// Re-fetches the principal on demand. Fail open: a failure is logged and
    /// the existing session is left intact, only an explicit [`Self::logout`]
    /// or a failed [`Self::initialize`] clears the session.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) {
        let Some(token) = self.access_token() else {
            return;
        };
        match self.provider.fetch_current_user(&token).await {
            Ok(principal) => self.update_principal(principal),
            Err(e) => warn!("refresh failed, keeping existing session: {e:#}"),
        }
    }

    /// Changes the password through the identity provider and forces
    /// re-authentication on success (the session is logged out)
    #[tracing::instrument(skip(self, args))]
    pub async fn change_password(&self, args: ChangePasswordReqArgs) -> anyhow::Result<()> {
        if args.new_password.expose_secret() != args.new_password_check.expose_secret() {
            return Err(ChangePasswordError::PasswordsDoNotMatch.into());
        }
        let token = self.access_token().ok_or(NotLoggedInError)?;
        let response = self
            .provider
            .change_password(args, &token)
            .await
            .context("change password failed")?;
        if response.success {
            self.logout();
            Ok(())
        } else {
            anyhow::bail!("{}", response.message)
        }
    }

    /// The only place the authenticated pair is written
    fn commit(
        &self,
        principal: Arc<Principal>,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        inner.principal = Some(principal);
        inner.access_token = Some(access_token);
        inner.refresh_token = refresh_token;
        inner.loading = false;
    }

    fn settle_anonymous(&self) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        inner.principal = None;
        inner.access_token = None;
        inner.refresh_token = None;
        inner.loading = false;
    }
}
