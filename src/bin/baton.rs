// src/bin/baton.rs

use anyhow::Result;
use baton::{
    cli::{Cli, Commands, handlers},
    core::{alias_resolver::Resolver, paths},
    models::Scope,
};
use clap::Parser;
use colored::Colorize;

/// The main entry point of the `baton` application. Sets up logging, parses
/// arguments, dispatches to the matching handler, and performs centralized
/// error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let scope = Scope::named(&cli.scope);
    let cwd = std::env::current_dir()?;
    let config_dir = paths::config_dir_for(&cwd, cli.config_dir.as_deref())?;
    log::debug!(
        "Using config directory '{}' and scope '{}'.",
        config_dir.display(),
        scope
    );

    let mut resolver = Resolver::new(config_dir);

    match cli.command {
        Commands::Run { tokens } | Commands::Invoke(tokens) => {
            handlers::run::handle(&mut resolver, &scope, tokens)
        }
        Commands::Plan { token } => handlers::plan::handle(&mut resolver, &scope, &token),
        Commands::List => handlers::list::handle(&mut resolver, &scope),
    }
}
