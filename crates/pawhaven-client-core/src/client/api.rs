use std::{fmt::Debug, sync::Arc};

use anyhow::{bail, Context as _};
use futures::channel::oneshot;
use pawhaven_shared::{
    const_config::path::{PATH_LOGIN, PATH_USER_ROLES},
    errors::NotLoggedInError,
    token::DisplayHint,
    uac::{LoginResponse, Username},
};
use reqwest::StatusCode;
use secrecy::ExposeSecret as _;
use tracing::{info, warn};

use super::{
    deliver, extract_response, handle_error, process_protected_json,
    resolver::{AuthorizationResolver, RoleResolution},
    Client, UiCallBack,
};
use crate::{
    errors::{ClientError, LoginError},
    guard::LandingRoute,
    session::{Identity, Session, SessionGeneration},
};
use pawhaven_shared::req_args::LoginReqArgs;

/// What a successful login ended with
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub identity: Arc<Identity>,
    /// Where the caller should navigate to next
    pub landing: LandingRoute,
    pub role_resolution: RoleResolution,
}

impl Client {
    /// Exchanges the credentials for a token then resolves the user's roles
    ///
    /// The token is committed to the session as soon as it arrives so a
    /// failing role service can not block the login. If another login or a
    /// logout happens before this one finishes this one reports
    /// [`LoginError::Superseded`] and leaves the session alone
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<LoginOutcome, LoginError>> {
        let (tx, rx) = oneshot::channel();
        if args.validate().is_err() {
            deliver(tx, Err(LoginError::InvalidInput));
            ui_notify();
            return rx;
        }
        let generation = self.session.begin_attempt();
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_login(resp, client, generation).await;
            deliver(tx, msg);
            ui_notify();
        };

        self.initiate_request(PATH_LOGIN, &args, on_done);
        rx
    }

    /// Fetches the roles of the logged in user again and merges them into the
    /// session
    #[tracing::instrument(skip(ui_notify))]
    pub fn refresh_authorization<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<Arc<Identity>, ClientError>> {
        let (tx, rx) = oneshot::channel();
        let (identity, generation) = match self.session.current_with_generation() {
            (Session::Authenticated(identity), generation) => (identity, generation),
            (Session::Anonymous, _) => {
                deliver(tx, Err(NotLoggedInError.into()));
                ui_notify();
                return rx;
            }
        };
        let request = self.build_request(
            PATH_USER_ROLES.method.clone(),
            &PATH_USER_ROLES.with_segment(identity.user_id()),
            Some(identity.token()),
        );
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let authorization = AuthorizationResolver::new(&client)
                .resolve_from_roles_response(resp, identity.user_id(), identity.token())
                .await;
            let msg = client
                .session
                .commit(generation, authorization.apply_to(&identity))
                .map_err(|e| ClientError::Request(e.into()));
            deliver(tx, msg);
            ui_notify();
        };
        reqwest_cross::fetch(request, on_done);
        rx
    }

    /// GET on behalf of the logged in user. This is what pages use to load
    /// their data
    ///
    /// A 401 response logs the user out, see [`ClientError::redirect_target`]
    #[tracing::instrument(skip(ui_notify))]
    pub fn fetch_protected<U, F>(
        &self,
        path: &str,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<U, ClientError>>
    where
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let Session::Authenticated(identity) = self.session.current() else {
            deliver(tx, Err(NotLoggedInError.into()));
            ui_notify();
            return rx;
        };
        let token = identity.token().clone();
        let request = self.build_request(reqwest::Method::GET, path, Some(&token));
        let session = self.session.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_protected_json(resp, session, token).await;
            deliver(tx, msg);
            ui_notify();
        };
        reqwest_cross::fetch(request, on_done);
        rx
    }

    /// Local only, the backend is not contacted so this always succeeds.
    /// Returns the route to navigate to
    #[tracing::instrument]
    pub fn logout(&self) -> &'static str {
        self.session.clear();
        LandingRoute::Home.path()
    }
}

#[tracing::instrument(ret, err(Debug), skip(client))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
    client: Client,
    generation: SessionGeneration,
) -> Result<LoginOutcome, LoginError> {
    let identity = exchange_credentials(response).await.map_err(|e| {
        warn!(?e, "credential exchange failed");
        LoginError::LoginFailed
    })?;

    let identity = client
        .session
        .commit(generation, identity)
        .map_err(|_| LoginError::Superseded)?;

    let authorization = AuthorizationResolver::new(&client)
        .resolve(identity.user_id(), identity.token())
        .await;

    let identity = client
        .session
        .commit(generation, authorization.apply_to(&identity))
        .map_err(|_| LoginError::Superseded)?;

    let landing = LandingRoute::for_roles(identity.roles());
    info!(user_id = %identity.user_id(), ?landing, "login complete");
    Ok(LoginOutcome {
        identity,
        landing,
        role_resolution: authorization.role_resolution,
    })
}

/// Turns the login response into an identity without any roles
async fn exchange_credentials(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<Identity> {
    let (response, status) = extract_response(response)?;
    if status != StatusCode::OK {
        return Err(handle_error(response).await);
    }
    let login_response: LoginResponse = response
        .json()
        .await
        .context("failed to parse result as json")?;
    let Some(data) = login_response.data else {
        bail!("login response did not include any data");
    };
    if data.token.is_empty() {
        bail!("login response included an empty token");
    }
    let username = Username::try_from(data.user.username)
        .context("login response included an invalid username")?;
    let display_hint = match data.token.decode_display_hint() {
        Ok(hint) => hint,
        Err(e) => {
            warn!(?e, "token claims could not be decoded for display");
            DisplayHint::default()
        }
    };
    Ok(Identity::new(data.user.id, username, data.token, display_hint))
}
