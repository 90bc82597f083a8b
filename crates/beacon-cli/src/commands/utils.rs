//! Helpers shared by the commands.

use std::path::PathBuf;

use crate::config::{find_project_root, BeaconConfig};
use crate::error::{CliError, Result};

/// Project root for the current directory, plus its validated config.
pub(crate) fn load_project() -> Result<(PathBuf, BeaconConfig)> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::Custom(format!("Failed to read current directory: {}", e)))?;
    let root = find_project_root(&cwd);
    let config = BeaconConfig::load(&root)?;
    Ok((root, config))
}
