//! envr CLI
//!
//! Resolves configuration values through the standard providers.

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

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} environment resolver", "envr".green().bold());
            println!();
            println!("Run {} for available commands.", "envr --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
            Err(_) => false,
        }
    };
    if installed {
        tracing::debug!(verbose, "tracing enabled");
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            path,
            qualifiers,
            properties,
            config,
            env_prefix,
            json,
        } => {
            let request = commands::ResolveRequest {
                path,
                qualifiers,
                properties,
                config,
                env_prefix,
            };
            commands::run_resolve(&request, json)
        }
        Commands::Parse { path, json } => commands::run_parse(&path, json),
        Commands::Types { json } => commands::run_types(json),
    }
}
