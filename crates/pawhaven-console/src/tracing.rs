use pawhaven_shared::telemetry::{self, TraceDestination};

use crate::cli::Cli;

const APP_NAME: &str = "pawhaven_console";

pub fn init(cli: &Cli, default_env_filter_directive: &str) -> anyhow::Result<()> {
    let destination =
        telemetry::init_for_app(APP_NAME, default_env_filter_directive, cli.is_to_std_out)?;
    if let TraceDestination::File(path) = destination {
        eprintln!("Tracing started to file {path:?}");
    }
    Ok(())
}
