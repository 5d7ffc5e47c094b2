// src/cli/handlers/list.rs

use anyhow::Result;
use colored::Colorize;

use crate::{core::alias_resolver::Resolver, models::Scope};

/// Entry point for the `list` command: print the raw alias definitions
/// visible in `scope`, sorted by name.
pub fn handle(resolver: &mut Resolver, scope: &Scope) -> Result<()> {
    let aliases = resolver.raw_aliases_for(scope)?;
    if aliases.is_empty() {
        println!("No aliases defined in scope '{}'.", scope.to_string().yellow());
        return Ok(());
    }

    println!("Aliases in scope '{}':", scope.to_string().bold());
    let mut names: Vec<&String> = aliases.keys().collect();
    names.sort();
    for name in names {
        if let Some(value) = aliases.get(name) {
            println!("  {} = {}", name.cyan(), value);
        }
    }
    Ok(())
}
