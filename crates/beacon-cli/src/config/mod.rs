//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `beacon.config.json` in the project root, if present
//! 3. `BEACON_*` environment variables (`BEACON_OUT_DIR`, `BEACON_DEV__PORT`, ...)
//!
//! The project root is the nearest ancestor of the working directory that
//! holds a `package.json`.

mod defaults;
mod loading;
mod validation;

use beacon_bundler::BuildOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub use defaults::*;
pub use loading::{find_project_root, env_key_to_path, CONFIG_FILE_NAME, ENV_PREFIX};

/// Contents of `beacon.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BeaconConfig {
    /// Application entry module, relative to the project root
    #[serde(default = "default_entry")]
    pub entry: PathBuf,

    /// Design source handed to the stylesheet compiler
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,

    /// Directory copied verbatim into the output directory
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Build output directory
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Substring identifying the entry script among the built files
    #[serde(default = "default_entry_marker")]
    pub entry_marker: String,

    /// Compiled stylesheet location, relative to `outDir`
    #[serde(default = "default_stylesheet_path")]
    pub stylesheet_path: String,

    /// Minify scripts
    #[serde(default = "default_minify")]
    pub minify: bool,

    /// Seconds the stylesheet compiler may run
    #[serde(default = "default_css_timeout_secs")]
    #[schemars(range(min = 1))]
    pub css_timeout_secs: u64,

    /// Dev server settings
    #[serde(default)]
    pub dev: DevSettings,
}

/// Settings for `beacon dev`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevSettings {
    /// Listen address; loopback only
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Paths starting with this prefix render the shell
    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,

    /// WebSocket endpoint
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Server name shown in the mock config and the page title
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_prefix: default_admin_prefix(),
            ws_path: default_ws_path(),
            name: default_server_name(),
        }
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            stylesheet: default_stylesheet(),
            public_dir: default_public_dir(),
            out_dir: default_out_dir(),
            entry_marker: default_entry_marker(),
            stylesheet_path: default_stylesheet_path(),
            minify: default_minify(),
            css_timeout_secs: default_css_timeout_secs(),
            dev: DevSettings::default(),
        }
    }
}

impl BeaconConfig {
    /// Build options with every path resolved against `root`.
    pub fn build_options(&self, root: &Path) -> BuildOptions {
        BuildOptions::new(root)
            .entry(&self.entry)
            .stylesheet(&self.stylesheet)
            .public_dir(&self.public_dir)
            .out_dir(&self.out_dir)
            .entry_marker(self.entry_marker.clone())
            .stylesheet_path(self.stylesheet_path.clone())
            .minify(self.minify)
            .css_timeout_secs(self.css_timeout_secs)
    }

    /// Absolute output directory.
    pub fn out_dir(&self, root: &Path) -> PathBuf {
        if self.out_dir.is_absolute() {
            self.out_dir.clone()
        } else {
            root.join(&self.out_dir)
        }
    }

    /// JSON schema of the config file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(BeaconConfig)).unwrap_or_default()
    }
}

impl DevSettings {
    /// Socket address to bind. Only valid after validation.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}
