//! Request-time shell rendering.

use std::io;

use beacon_bundler::TokenValues;
use uuid::Uuid;

use crate::dev::state::DevState;

/// Shown when the shell is missing on a route that requires it.
pub const MISSING_SHELL_MESSAGE: &str =
    "The HTML shell has not been built yet. Run `beacon build` first, then reload.";

/// Fresh CSP nonce. Reads no shared state.
pub fn new_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Token values for one request.
pub fn token_values(state: &DevState, nonce: String) -> TokenValues {
    let mock = state.mock();
    TokenValues {
        name: escape_html(&mock.config().name),
        nonce,
        server_config_json: mock.config_script_json().to_string(),
        status_json: mock.status_script_json().to_string(),
    }
}

/// Read the shell from disk and substitute every token.
///
/// The file is read on every request so a rebuild shows up on reload.
pub async fn render(state: &DevState) -> io::Result<String> {
    let template = tokio::fs::read_to_string(state.shell_path()).await?;
    Ok(token_values(state, new_nonce()).apply(&template))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
