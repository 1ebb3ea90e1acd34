use anyhow::{anyhow, Context};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use pawhaven_shared::{
    const_config::{
        client::CLIENT_DEFAULT_BACKEND_ADDRESS,
        path::{PathSpec, PATH_HEALTH_CHECK},
    },
    token::AuthToken,
};
use reqwest::{header::AUTHORIZATION, Method, StatusCode};
use std::{fmt::Debug, sync::Arc};
use tracing::{info, warn};

use crate::{errors::ClientError, session::SessionContext};

pub mod api;
pub mod resolver;

pub use api::LoginOutcome;

/// Handle used by pages to talk to the backend. Clones share the same session
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    server_address: Arc<str>,
    session: SessionContext,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(
            CLIENT_DEFAULT_BACKEND_ADDRESS.to_string(),
            SessionContext::in_memory(),
        )
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(session))]
    pub fn new(server_address: String, session: SessionContext) -> Self {
        Self {
            api_client: reqwest::Client::new(),
            server_address: server_address.trim_end_matches('/').into(),
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>>
    where
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_empty(resp).await;
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request(PATH_HEALTH_CHECK, &DUMMY_ARGUMENT, on_done);
        rx
    }

    /// Builds a request, attaching the bearer token if one is provided
    fn build_request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AuthToken>,
    ) -> reqwest::RequestBuilder {
        let request = self.api_client.request(method, self.path_to_url(path));
        match token {
            Some(token) => request.header(AUTHORIZATION, token.bearer_header_value()),
            None => request,
        }
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_get_method = path_spec.method == Method::GET;
        let mut request = self.build_request(path_spec.method, path_spec.path, None);
        request = if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        };
        reqwest_cross::fetch(request, on_done)
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_address)
    }
}

const DUMMY_ARGUMENT: &[(&str, &str)] = &[];

/// Sends the result to whoever is waiting on the receiver, if they are still
/// around
fn deliver<T>(tx: oneshot::Sender<T>, msg: T) {
    if tx.send(msg).is_err() {
        warn!("receiver dropped before the result could be delivered");
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

/// Response handling for requests made on behalf of a session
///
/// A 401 means the backend no longer accepts the token, the session the
/// request was made for is cleared (if it still holds that token)
#[tracing::instrument(ret, err(Debug), skip(session, token))]
async fn process_protected_json<T>(
    response: reqwest::Result<reqwest::Response>,
    session: SessionContext,
    token: AuthToken,
) -> Result<T, ClientError>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => Ok(response
            .json()
            .await
            .context("failed to parse result as json")?),
        StatusCode::UNAUTHORIZED => {
            if session.clear_if_current(&token) {
                info!("backend rejected the session token, session cleared");
            }
            Err(ClientError::SessionExpired)
        }
        _ => Err(handle_error(response).await.into()),
    }
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    debug_assert_ne!(
        status,
        StatusCode::OK,
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let Ok(body) = response.text().await else {
        return anyhow!("failed to get response body");
    };
    if body.is_empty() {
        anyhow!("request failed with status code: {status} and no body")
    } else {
        anyhow!("request failed with status code: {status}. Body: {body}")
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
