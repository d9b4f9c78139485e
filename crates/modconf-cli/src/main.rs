//! modconf CLI
//!
//! Resolves configuration files and prints the result.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Resolve(args) => commands::run_resolve(args),
        Commands::Routes(args) => commands::run_routes(args),
    }
}

/// DEBUG with `--verbose`, otherwise `RUST_LOG` (default `warn`). Logs go to stderr.
fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr).with_target(verbose);
    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };
    result.expect("Failed to set tracing subscriber");
    tracing::debug!("Verbose mode enabled");
}
