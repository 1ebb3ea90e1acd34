use clap::{Parser, Subcommand};
use pawhaven_client_core::LayoutArea;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and print the page to go to
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show who is currently logged in
    Whoami,
    /// Check if the current session may open a route
    Check { route: String },
    /// Mount an area layout (admin or shelter)
    Open { area: LayoutArea },
    /// Fetch a protected resource on behalf of the current session
    Get { path: String },
    /// Reload the roles of the current session from the backend
    Refresh,
    /// Check if the backend is reachable
    Health,
    /// Forget the current session
    Logout,
}
