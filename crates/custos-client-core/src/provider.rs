use std::fmt::Debug;

use custos_shared::{
    req_args::{ChangePasswordReqArgs, LoginReqArgs},
    token::AccessToken,
    uac::{ChangePasswordResponse, LoginResponse, Principal},
};
use futures::future::BoxFuture;

/// The external identity provider collaborator the session store delegates
/// authentication to.
///
/// Object safe so the session store can be wired to the HTTP client in
/// production and to a scripted implementation in tests.
pub trait IdentityProvider: Debug + Send + Sync {
    /// Authenticates the credentials and returns the issued tokens together
    /// with the principal record
    fn login(&self, args: LoginReqArgs) -> BoxFuture<'static, anyhow::Result<LoginResponse>>;

    /// Fetches the principal the token belongs to (used on cold start and on
    /// demand refresh)
    fn fetch_current_user(
        &self,
        token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<Principal>>;

    fn change_password(
        &self,
        args: ChangePasswordReqArgs,
        token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<ChangePasswordResponse>>;
}
