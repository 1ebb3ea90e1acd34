use clap::Parser as _;
use pawhaven_shared::uac::init_route_requirements_to_defaults;
use pawhaven_console::{
    build_client, cli::Cli, commands, configuration::get_configuration, create_runtime,
};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let configuration = get_configuration()?;

    if let Err(e) = pawhaven_console::tracing::init(&args, &configuration.logging.default_filter)
    {
        eprintln!("Failed to start tracing: {e}");
    }

    init_route_requirements_to_defaults();

    let rt = create_runtime();
    let output = rt.block_on(async {
        let client = build_client(&configuration);
        commands::run(args.command, &client).await
    })?;
    println!("{output}");
    Ok(())
}
