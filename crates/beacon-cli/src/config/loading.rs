use crate::config::BeaconConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use std::path::{Path, PathBuf};

/// Config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "beacon.config.json";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "BEACON_";

impl BeaconConfig {
    /// Load and validate configuration for the project at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config: Self = Self::figment(root)
            .extract()
            .map_err(ConfigError::from)?;
        config.validate()?;

        tracing::debug!(
            root = %root.display(),
            out_dir = %config.out_dir.display(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Merged sources without extraction.
    pub fn figment(root: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = root.join(CONFIG_FILE_NAME);
        if config_file.is_file() {
            tracing::debug!(path = %config_file.display(), "reading config file");
            figment = figment.merge(Json::file(config_file));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| env_key_to_path(key.as_str()).into()),
        )
    }
}

/// Map an env key, prefix stripped, to a config path.
///
/// `__` separates nesting levels; single underscores become camelCase:
/// `out_dir` is `outDir`, `dev__admin_prefix` is `dev.adminPrefix`.
pub fn env_key_to_path(key: &str) -> String {
    key.split("__")
        .map(snake_to_camel)
        .collect::<Vec<_>>()
        .join(".")
}

fn snake_to_camel(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut upper = false;
    for c in part.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Nearest ancestor of `start` (inclusive) holding a `package.json`, else
/// `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .unwrap_or(start)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_env_key_to_path() {
        assert_eq!(env_key_to_path("out_dir"), "outDir");
        assert_eq!(env_key_to_path("css_timeout_secs"), "cssTimeoutSecs");
        assert_eq!(env_key_to_path("dev__port"), "dev.port");
        assert_eq!(env_key_to_path("dev__admin_prefix"), "dev.adminPrefix");
        assert_eq!(env_key_to_path("minify"), "minify");
        assert_eq!(env_key_to_path("DEV__WS_PATH"), "dev.wsPath");
    }

    #[test]
    fn test_find_project_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();
        let nested = temp.path().join("src/components");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), temp.path());
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = BeaconConfig::load(temp.path()).unwrap();
        assert_eq!(config, BeaconConfig::default());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{"outDir":"build","minify":false,"dev":{"port":4100,"name":"Night Stream"}}"#,
        )
        .unwrap();

        let config = BeaconConfig::load(temp.path()).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("build"));
        assert!(!config.minify);
        assert_eq!(config.dev.port, 4100);
        assert_eq!(config.dev.name, "Night Stream");
        assert_eq!(config.dev.ws_path, "/ws");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{"outDir":"build","dev":{"port":4100}}"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("BEACON_OUT_DIR", "www");
            std::env::set_var("BEACON_DEV__PORT", "5000");
            std::env::set_var("BEACON_DEV__ADMIN_PREFIX", "/manage");
        }
        let result = BeaconConfig::load(temp.path());
        unsafe {
            std::env::remove_var("BEACON_OUT_DIR");
            std::env::remove_var("BEACON_DEV__PORT");
            std::env::remove_var("BEACON_DEV__ADMIN_PREFIX");
        }

        let config = result.unwrap();
        assert_eq!(config.out_dir, PathBuf::from("www"));
        assert_eq!(config.dev.port, 5000);
        assert_eq!(config.dev.admin_prefix, "/manage");
    }

    #[test]
    #[serial]
    fn test_unknown_key_is_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), r#"{"outdir":"build"}"#).unwrap();

        let err = BeaconConfig::load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Config(ConfigError::Extract { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_invalid_json_is_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(BeaconConfig::load(temp.path()).is_err());
    }
}
