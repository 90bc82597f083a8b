use crate::config::BeaconConfig;
use crate::error::{ConfigError, Result};
use std::net::IpAddr;
use std::path::Component;

fn invalid(field: &str, value: impl Into<String>, hint: &str) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.into(),
        hint: hint.to_string(),
    }
    .into()
}

impl BeaconConfig {
    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.entry_marker.is_empty() {
            return Err(invalid(
                "entryMarker",
                "",
                "Use a substring of the entry script's file name, e.g. \"index\"",
            ));
        }

        let stylesheet_path = std::path::Path::new(&self.stylesheet_path);
        if self.stylesheet_path.is_empty()
            || stylesheet_path.is_absolute()
            || stylesheet_path
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(invalid(
                "stylesheetPath",
                self.stylesheet_path.clone(),
                "Must be a relative path inside outDir",
            ));
        }

        if self.css_timeout_secs == 0 {
            return Err(invalid("cssTimeoutSecs", "0", "Must be at least 1 second"));
        }

        let host = self
            .dev
            .host
            .parse::<IpAddr>()
            .map_err(|_| {
                invalid(
                    "dev.host",
                    self.dev.host.clone(),
                    "Must be an IP address such as 127.0.0.1",
                )
            })?;
        if !host.is_loopback() {
            return Err(invalid(
                "dev.host",
                self.dev.host.clone(),
                "The dev server has no authentication; bind a loopback address",
            ));
        }

        if !self.dev.ws_path.starts_with('/') || self.dev.ws_path == "/" {
            return Err(invalid(
                "dev.wsPath",
                self.dev.ws_path.clone(),
                "Must start with '/' and name a path, e.g. \"/ws\"",
            ));
        }

        if !self.dev.admin_prefix.starts_with('/') || self.dev.admin_prefix == "/" {
            return Err(invalid(
                "dev.adminPrefix",
                self.dev.admin_prefix.clone(),
                "Must start with '/' and name a path, e.g. \"/admin\"",
            ));
        }

        if self.dev.name.trim().is_empty() {
            return Err(invalid("dev.name", self.dev.name.clone(), "Name cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(config: BeaconConfig) -> String {
        match config.validate() {
            Err(crate::error::CliError::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        BeaconConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = BeaconConfig::default();
        config.entry_marker.clear();
        assert_eq!(field_of(config), "entryMarker");

        let mut config = BeaconConfig::default();
        config.stylesheet_path = "../styles.css".into();
        assert_eq!(field_of(config), "stylesheetPath");

        let mut config = BeaconConfig::default();
        config.css_timeout_secs = 0;
        assert_eq!(field_of(config), "cssTimeoutSecs");

        let mut config = BeaconConfig::default();
        config.dev.host = "localhost".into();
        assert_eq!(field_of(config), "dev.host");

        let mut config = BeaconConfig::default();
        config.dev.host = "0.0.0.0".into();
        assert_eq!(field_of(config), "dev.host");

        let mut config = BeaconConfig::default();
        config.dev.ws_path = "ws".into();
        assert_eq!(field_of(config), "dev.wsPath");

        let mut config = BeaconConfig::default();
        config.dev.admin_prefix = "/".into();
        assert_eq!(field_of(config), "dev.adminPrefix");
    }

    #[test]
    fn test_ipv6_loopback_allowed() {
        let mut config = BeaconConfig::default();
        config.dev.host = "::1".into();
        config.validate().unwrap();
    }
}
