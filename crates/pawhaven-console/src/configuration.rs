use std::{
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub backend: BackendSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct BackendSettings {
    pub base_url: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// Where the session is persisted between runs
    pub file: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    pub default_filter: String,
}

pub fn get_configuration() -> anyhow::Result<Configuration> {
    let base_path = std::env::current_dir().context("failed to determine the current directory")?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)
        .context("failed to parse APP_ENVIRONMENT")?;
    get_configuration_from(&base_path.join("configuration"), environment)
}

/// Loads `base.toml`, then the file for `environment` (if present), then
/// environment variables prefixed with `APP`
pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> anyhow::Result<Configuration> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_BACKEND__BASE_URL=http://localhost:5001` would set `Settings.backend.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("failed to load configuration")?;

    settings
        .try_deserialize::<Configuration>()
        .context("failed to deserialize configuration")
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
