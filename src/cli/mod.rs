// src/cli/mod.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod handlers;

/// baton: a scoped alias resolver and build orchestrator.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
pub struct Cli {
    /// The configuration scope to resolve under.
    #[arg(long, short, global = true, default_value = "default")]
    pub scope: String,

    /// Configuration directory override. Defaults to a project-local
    /// `.baton` directory, falling back to the user config directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and execute aliases or scripts, in order.
    Run {
        /// Invocation tokens: alias/script names, `scope:token` references
        /// and `-P[scope#]key=value` ad-hoc property overrides.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Resolve a token and print its expansion tree and flattened plan.
    Plan {
        /// The alias or script token to expand.
        token: String,
    },
    /// List the alias definitions visible in the selected scope.
    List,
    /// Anything that is not a known subcommand is treated as an invocation
    /// and handed to `run` as-is (so `baton clean` works like
    /// `baton run clean`). The first element is the unmatched token itself.
    #[command(external_subcommand)]
    Invoke(Vec<String>),
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_token_is_routed_to_run() {
        let cli = Cli::try_parse_from(["baton", "clean", "-Pcolor=false"]).unwrap();
        match cli.command {
            Commands::Invoke(tokens) => assert_eq!(tokens, vec!["clean", "-Pcolor=false"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bare_token_respects_global_scope_flag() {
        let cli = Cli::try_parse_from(["baton", "-s", "test", "compile"]).unwrap();
        assert_eq!(cli.scope, "test");
        match cli.command {
            Commands::Invoke(tokens) => assert_eq!(tokens, vec!["compile"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_run_subcommand_still_parses() {
        let cli = Cli::try_parse_from(["baton", "run", "clean", "compile"]).unwrap();
        match cli.command {
            Commands::Run { tokens } => assert_eq!(tokens, vec!["clean", "compile"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
