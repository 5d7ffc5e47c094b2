// src/system/executor.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::constants::ENV_PROP_PREFIX;
use crate::models::{Invocation, Scope, Script};

lazy_static! {
    // `[scope#]key=value`, as accumulated by the resolver with the -P marker
    // already stripped.
    static ref AD_HOC_PROP_RE: Regex = Regex::new(r"^(?:([^#=]+)#)?([^=]+)=(.*)$").unwrap();
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Malformed ad-hoc property override: '-P{0}'")]
    MalformedProp(String),
    #[error("Script '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Script '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// A parsed `[scope#]key=value` override. `scope: None` means the override
/// applies to every script regardless of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AdHocProp {
    scope: Option<Scope>,
    key: String,
    value: String,
}

fn parse_ad_hoc_props(raw: &[String]) -> Result<Vec<AdHocProp>, ExecutionError> {
    raw.iter()
        .map(|entry| {
            let caps = AD_HOC_PROP_RE
                .captures(entry)
                .ok_or_else(|| ExecutionError::MalformedProp(entry.clone()))?;
            Ok(AdHocProp {
                scope: caps.get(1).map(|m| Scope::named(m.as_str())),
                key: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                value: caps
                    .get(3)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Environment variable name for an ad-hoc property key: `BATON_` plus the
/// uppercased key with non-alphanumerics mapped to `_`.
fn env_var_name(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", ENV_PROP_PREFIX, sanitized)
}

/// The overrides in effect for a script of `scope`: unscoped entries plus
/// entries whose scope matches, applied in encounter order so that later
/// entries win for the same key.
fn env_for_scope(props: &[AdHocProp], scope: &Scope) -> HashMap<String, String> {
    let mut env = HashMap::new();
    for prop in props {
        let applies = match &prop.scope {
            None => true,
            Some(prop_scope) => prop_scope == scope,
        };
        if applies {
            env.insert(env_var_name(&prop.key), prop.value.clone());
        }
    }
    env
}

/// Executes a resolved invocation: flattens it into the ordered leaf plan,
/// installs the ad-hoc property overrides as environment variables, and runs
/// each script in order, stopping at the first failure.
///
/// `cli_props` are overrides given directly on the command line; for an
/// alias they were already pre-seeded into its accumulator by the resolver,
/// so they are only consulted when the invocation is a plain script.
pub fn execute_plan(
    invocation: &Invocation,
    cli_props: &[String],
    cwd: &Path,
) -> Result<(), ExecutionError> {
    let raw_props = match invocation {
        Invocation::Alias(alias) => alias.ad_hoc_props.as_slice(),
        Invocation::Script(_) => cli_props,
    };
    let props = parse_ad_hoc_props(raw_props)?;

    for script in invocation.flatten() {
        let env = env_for_scope(&props, &script.scope);
        execute_script(script, &env, cwd)?;
    }
    Ok(())
}

fn execute_script(
    script: &Script,
    env_vars: &HashMap<String, String>,
    cwd: &Path,
) -> Result<(), ExecutionError> {
    let clean_cwd = dunce::simplified(cwd);
    log::debug!(
        "Executing '{}' (scope '{}') in '{}'.",
        script.unparsed_name,
        script.scope,
        clean_cwd.display()
    );

    let mut command = StdCommand::new(&script.name);
    command
        .args(&script.arguments)
        .current_dir(clean_cwd)
        .envs(env_vars)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Fallback for Windows built-ins like `echo`: try a direct spawn first,
    // retry through `cmd /C` on NotFound.
    let status = match command.status() {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", script.name);
            let mut line = script.name.clone();
            for arg in &script.arguments {
                line.push(' ');
                line.push_str(arg);
            }
            StdCommand::new("cmd")
                .arg("/C")
                .arg(&line)
                .current_dir(clean_cwd)
                .envs(env_vars)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| ExecutionError::CommandFailed(script.unparsed_name.clone(), e))?
        }
        Err(e) => {
            return Err(ExecutionError::CommandFailed(
                script.unparsed_name.clone(),
                e,
            ));
        }
    };

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(
            script.unparsed_name.clone(),
        ));
    }
    Ok(())
}

// MARK: --- UNIT TESTS ---
