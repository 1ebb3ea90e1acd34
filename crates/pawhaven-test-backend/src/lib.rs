#![warn(unused_crate_dependencies)]

use actix_web::{web, App, HttpServer};
use anyhow::Context as _;
use pawhaven_shared::telemetry::{self, get_subscriber, init_subscriber};
use std::{net::TcpListener, ops::Deref, sync::LazyLock};
use tracing::info;
use tracing_actix_web::TracingLogger;
use uuid::Uuid;

mod routes;
mod scenario;
mod state;

pub use scenario::{LoginBehavior, RolesBehavior, ShelterBehavior, TestUser};
pub use state::RecordedRequest;

use state::BackendState;

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Handle to a running fake backend. The server is stopped when the runtime
/// it was spawned on shuts down
#[derive(Debug)]
pub struct TestBackend {
    pub address: String,
    state: web::Data<BackendState>,
}

impl TestBackend {
    /// Starts the fake backend on a random port serving the users provided
    pub async fn spawn(users: Vec<TestUser>) -> Self {
        start_tracing();
        let state = web::Data::new(BackendState::new(users));
        let port = start_server(state.clone())
            .await
            .expect("failed to start test backend");
        Self {
            address: port_to_test_address(port),
            state,
        }
    }

    /// Every token handed out so far is rejected from now on
    pub fn revoke_all_tokens(&self) {
        self.state.revoke_all_tokens();
    }

    /// Changes what the role endpoint returns for `user_id`
    pub fn set_roles(&self, user_id: u64, roles: RolesBehavior) {
        self.state.update_user(user_id, |user| user.roles = roles);
    }

    /// Requests received so far (excluding health checks)
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded_requests()
    }

    /// Recorded requests whose path starts with `prefix`
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.recorded_requests()
            .into_iter()
            .filter(|x| x.path.starts_with(prefix))
            .collect()
    }
}

pub fn port_to_test_address(application_port: u16) -> String {
    format!("http://localhost:{application_port}")
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

async fn start_server(state: web::Data<BackendState>) -> anyhow::Result<u16> {
    let listener =
        TcpListener::bind("127.0.0.1:0").context("failed to bind to a random port")?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    info!(?port, "Port assigned to the test backend is {port}");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(routes::configure)
            .app_data(state.clone())
    })
    .workers(1)
    .listen(listener)
    .context("failed to bind HTTP Server to listener")?
    .run();
    tokio::spawn(server);
    Ok(port)
}
