// src/core/paths.rs

use crate::constants::BATON_DIR;
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    // Computed at most once per process; subsequent lookups reuse it.
    static ref USER_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("No user configuration directory is available on this system.")]
    NoUserConfigDir,
    #[error("Could not prepare configuration directory '{path}': {source}")]
    Prepare {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Selects the configuration directory for a run: an explicit override wins,
/// then a project-local `.baton` directory under `cwd`, then the user-level
/// `baton` directory (created on first use and memoized for the process).
pub fn config_dir_for(cwd: &Path, explicit: Option<&Path>) -> Result<PathBuf, PathError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let local = cwd.join(BATON_DIR);
    if local.is_dir() {
        return Ok(local);
    }
    user_config_dir()
}

fn user_config_dir() -> Result<PathBuf, PathError> {
    let mut slot = USER_DIR.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(dir) = slot.as_ref() {
        return Ok(dir.clone());
    }

    let dir = dirs::config_dir()
        .ok_or(PathError::NoUserConfigDir)?
        .join("baton");
    fs::create_dir_all(&dir).map_err(|e| PathError::Prepare {
        path: dir.display().to_string(),
        source: e,
    })?;

    *slot = Some(dir.clone());
    Ok(dir)
}

// MARK: --- UNIT TESTS ---
