use anyhow::{anyhow, Context};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use custos_shared::{
    const_config::path::{PathSpec, PATH_HEALTH_CHECK},
    token::AccessToken,
};
use futures::channel::oneshot;
use reqwest::{Method, StatusCode};
use std::fmt::Debug;
use tracing::info;

mod identity;

pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[("", "")];

/// HTTP client for the identity provider backing the console
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    server_address: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE")]
    pub fn new(server_address: String) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            server_address,
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(PATH_HEALTH_CHECK, &DUMMY_ARGUMENT, None, ui_notify)
    }

    #[tracing::instrument(skip(args, bearer, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(
        &self,
        path_spec: PathSpec,
        args: &T,
        bearer: Option<&AccessToken>,
        on_done: F,
    ) where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_get_method = path_spec.method == Method::GET;
        let mut request = self
            .api_client
            .request(path_spec.method, self.path_to_url(path_spec.path));
        request = if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        };
        if let Some(token) = bearer {
            request = request.bearer_auth(token.as_str());
        }
        reqwest_cross::fetch(request, on_done)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        bearer: Option<&AccessToken>,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
        U: Send + std::fmt::Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_json_body(resp).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path_spec, args, bearer, on_done);
        rx
    }

    fn send_request_expect_empty<F, T>(
        &self,
        path_spec: PathSpec,
        args: &T,
        bearer: Option<&AccessToken>,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_empty(resp).await;
            tx.send(msg).expect("failed to send oneshot msg");
            ui_notify();
        };
        self.initiate_request(path_spec, args, bearer, on_done);
        rx
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_address)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(response: reqwest::Result<reqwest::Response>) -> anyhow::Result<()> {
    let (response, status) = extract_response(response)?;
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(response: reqwest::Result<reqwest::Response>) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => Ok(response
            .json()
            .await
            .context("failed to parse result as json")?),
        _ => Err(handle_error(response).await),
    }
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let Ok(body) = response.text().await else {
        return anyhow!("failed to get response body");
    };
    if body.is_empty() {
        anyhow!("request failed with status code: {status} and no body")
    } else {
        anyhow!("{body}")
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.context("failed to send request")?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
