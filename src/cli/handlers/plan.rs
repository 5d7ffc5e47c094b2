// src/cli/handlers/plan.rs

use anyhow::{Context, Result};
use colored::Colorize;

use crate::{core::alias_resolver::Resolver, core::plan_display, models::Scope};

/// Entry point for the `plan` command: resolve without executing and print
/// the expansion tree plus the flattened execution plan.
pub fn handle(resolver: &mut Resolver, scope: &Scope, token: &str) -> Result<()> {
    let invocation = resolver
        .resolve(scope, token, Vec::new())
        .with_context(|| format!("Failed to resolve '{}'.", token.cyan()))?;
    plan_display::display_plan(&invocation);
    Ok(())
}
