//! [`IdentityProvider`] wiring for the HTTP [`Client`]

use anyhow::Context as _;
use custos_shared::{
    const_config::path::{PATH_AUTH_CHANGE_PASSWORD, PATH_AUTH_LOGIN, PATH_AUTH_ME},
    req_args::{ChangePasswordReqArgs, LoginReqArgs},
    token::AccessToken,
    uac::{ChangePasswordResponse, CurrentUserResponse, LoginResponse, Principal},
};
use futures::future::BoxFuture;
use secrecy::ExposeSecret as _;

use crate::{provider::IdentityProvider, Client};

impl IdentityProvider for Client {
    #[tracing::instrument(skip(self, args))]
    fn login(&self, args: LoginReqArgs) -> BoxFuture<'static, anyhow::Result<LoginResponse>> {
        let args = serde_json::json!({
            "username": args.username,
            "password": args.password.expose_secret(),
        });
        let rx = self.send_request_expect_json(PATH_AUTH_LOGIN, &args, None, || {});
        Box::pin(async move { rx.await.context("no response received for login request")? })
    }

    #[tracing::instrument(skip(self, token))]
    fn fetch_current_user(
        &self,
        token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<Principal>> {
        let rx = self.send_request_expect_json(
            PATH_AUTH_ME,
            &crate::client::DUMMY_ARGUMENT,
            Some(token),
            || {},
        );
        Box::pin(async move {
            let response: CurrentUserResponse = rx
                .await
                .context("no response received for current user request")??;
            Ok(response.user)
        })
    }

    #[tracing::instrument(skip(self, args, token))]
    fn change_password(
        &self,
        args: ChangePasswordReqArgs,
        token: &AccessToken,
    ) -> BoxFuture<'static, anyhow::Result<ChangePasswordResponse>> {
        let args = serde_json::json!({
            "currentPassword": args.current_password.expose_secret(),
            "newPassword": args.new_password.expose_secret(),
            "confirmPassword": args.new_password_check.expose_secret(),
        });
        let rx = self.send_request_expect_json(PATH_AUTH_CHANGE_PASSWORD, &args, Some(token), || {});
        Box::pin(async move {
            rx.await
                .context("no response received for change password request")?
        })
    }
}
