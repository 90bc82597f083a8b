//! `beacon dev`.

use crate::commands::utils;
use crate::dev::{DevServer, DevState};
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the dev command.
///
/// Serves whatever the last `beacon build` produced. A missing shell is not
/// fatal: static files and the API still work, and shell routes explain what
/// to do.
pub async fn execute() -> Result<()> {
    let (root, config) = utils::load_project()?;
    let settings = config.dev.clone();

    let addr = settings.socket_addr().ok_or_else(|| {
        CliError::Server(format!("Invalid listen address: {}", settings.host))
    })?;

    let out_dir = config.out_dir(&root);
    let state = DevState::new(&out_dir, settings)?;

    if !state.shell_path().is_file() {
        ui::warning(&format!(
            "{} not found. Run `beacon build` first.",
            state.shell_path().display()
        ));
    }
    ui::info(&format!("Serving {}", out_dir.display()));

    DevServer::new(addr, state).start().await?;

    ui::info("Development server stopped");
    Ok(())
}
