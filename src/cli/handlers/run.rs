// src/cli/handlers/run.rs

use anyhow::{Context, Result, anyhow};
use colored::Colorize;

use crate::{
    constants::AD_HOC_PROP_MARKER,
    core::alias_resolver::Resolver,
    models::Scope,
    system::executor,
};

/// Main entry point for the `run` command. Splits the raw tokens into
/// ad-hoc property overrides and invocation tokens, resolves each
/// invocation under `scope`, and executes the flattened plans in order.
pub fn handle(resolver: &mut Resolver, scope: &Scope, tokens: Vec<String>) -> Result<()> {
    let mut cli_props = Vec::new();
    let mut invocations = Vec::new();
    for token in tokens {
        if let Some(prop) = token.strip_prefix(AD_HOC_PROP_MARKER) {
            cli_props.push(prop.to_string());
        } else {
            invocations.push(token);
        }
    }

    if invocations.is_empty() {
        return Err(anyhow!("No alias or script given. Nothing to run."));
    }

    let cwd = std::env::current_dir().context("Could not determine the current directory.")?;

    for token in invocations {
        let invocation = resolver
            .resolve(scope, &token, cli_props.clone())
            .with_context(|| format!("Failed to resolve '{}'.", token.cyan()))?;

        let plan_len = invocation.flatten().len();
        log::debug!("'{}' expands to {} script(s).", token, plan_len);
        executor::execute_plan(&invocation, &cli_props, &cwd)
            .with_context(|| format!("Execution of '{}' failed.", token.cyan()))?;
    }
    Ok(())
}
