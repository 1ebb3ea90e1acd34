//! Command line stand in for the browser shell of the console. The session is
//! kept in a file so it survives between runs the way local storage survives
//! page reloads

pub mod cli;
pub mod commands;
pub mod configuration;
pub mod tracing;

use pawhaven_client_core::{Client, FileStore, SessionContext};

use crate::configuration::Configuration;

pub fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Unable to create Runtime")
}

/// Builds a client whose session is persisted to the configured file
pub fn build_client(configuration: &Configuration) -> Client {
    let store = FileStore::new(configuration.session.file.clone());
    Client::new(
        configuration.backend.base_url.clone(),
        SessionContext::new(store),
    )
}
