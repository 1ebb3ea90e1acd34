//! Each command mirrors what a page of the console does when the user
//! interacts with it

use anyhow::Context as _;
use futures::channel::oneshot;
use pawhaven_client_core::{
    Client, ClientError, GateState, Identity, LayoutGate, LoginError,
    RoleResolution, RouteGuard, Session,
};
use pawhaven_shared::{internal_error, req_args::LoginReqArgs};
use tracing::{info, instrument, warn};

use crate::cli::Command;

/// Runs `command` and returns what should be shown to the user
#[instrument(skip_all)]
pub async fn run(command: Command, client: &Client) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => login(client, email, password).await,
        Command::Whoami => Ok(whoami(&client.session().rehydrate())),
        Command::Check { route } => Ok(check(client, &route)),
        Command::Open { area } => {
            let mut gate = LayoutGate::new(area);
            let state = gate.mount(client.session());
            Ok(match state {
                GateState::Authorized(identity) => {
                    format!("{area:?} area opened for {}", describe(identity))
                }
                GateState::Redirecting(target) => format!("Redirecting to {target}"),
                GateState::Checking => "Still checking the session".to_string(),
            })
        }
        Command::Get { path } => get(client, &path).await,
        Command::Refresh => {
            let identity = await_rx(client.refresh_authorization(no_cb))
                .await?
                .context("failed to refresh roles")?;
            Ok(describe(&identity))
        }
        Command::Health => {
            await_rx(client.health_check(no_cb))
                .await?
                .context("backend is not reachable")?;
            Ok("Backend is reachable".to_string())
        }
        Command::Logout => {
            let target = client.logout();
            Ok(format!("Logged out. Redirecting to {target}"))
        }
    }
}

async fn login(client: &Client, email: String, password: String) -> anyhow::Result<String> {
    let args = LoginReqArgs::new(email, password.into());
    let outcome = match await_rx(client.login(args, no_cb)).await? {
        Ok(outcome) => outcome,
        Err(e @ (LoginError::LoginFailed | LoginError::InvalidInput)) => return Ok(e.to_string()),
        Err(e @ LoginError::Superseded) => return Err(e.into()),
    };
    let mut lines = vec![format!("Logged in as {}", describe(&outcome.identity))];
    match outcome.role_resolution {
        RoleResolution::Resolved => {}
        RoleResolution::NoRolesAssigned => lines.push("No roles are assigned to this user".into()),
        RoleResolution::FetchFailed => {
            warn!("roles could not be loaded at login");
            lines.push("Roles could not be loaded, try `refresh` later".into())
        }
    }
    if outcome.identity.is_unassigned_shelter_staff() {
        lines.push("No shelter is linked to this account yet".into());
    }
    lines.push(format!("Redirecting to {}", outcome.landing.path()));
    Ok(lines.join("\n"))
}

fn whoami(session: &Session) -> String {
    match session.identity() {
        Some(identity) => describe(identity),
        None => "anonymous".to_string(),
    }
}

fn check(client: &Client, route: &str) -> String {
    let decision = RouteGuard::check_path(route, &client.session().rehydrate());
    match decision.redirect_target() {
        None => format!("{route}: granted"),
        Some(target) => format!("{route}: redirect to {target}"),
    }
}

async fn get(client: &Client, path: &str) -> anyhow::Result<String> {
    match await_rx(client.fetch_protected::<serde_json::Value, _>(path, no_cb)).await? {
        Ok(value) => serde_json::to_string_pretty(&value).context("failed to format response"),
        Err(e @ ClientError::SessionExpired) => {
            info!("session expired while fetching {path}");
            Ok(format!(
                "{e}. Redirecting to {}",
                e.redirect_target().unwrap_or_default()
            ))
        }
        Err(e) => Err(e.into()),
    }
}

fn describe(identity: &Identity) -> String {
    let roles = identity
        .roles()
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>();
    let roles = if roles.is_empty() {
        "no roles".to_string()
    } else {
        roles.join(", ")
    };
    match identity.shelter_id() {
        Some(shelter_id) => format!(
            "{} (id {}) [{roles}] shelter {shelter_id}",
            identity.username(),
            identity.user_id()
        ),
        None => format!(
            "{} (id {}) [{roles}]",
            identity.username(),
            identity.user_id()
        ),
    }
}

/// Waits for the result of a request started by the client
async fn await_rx<T>(rx: oneshot::Receiver<T>) -> anyhow::Result<T> {
    rx.await
        .map_err(|e| anyhow::anyhow!(internal_error!(format!("request was dropped: {e}"))))
}

fn no_cb() {}
