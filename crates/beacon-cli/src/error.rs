//! Error types for the beacon CLI.
//!
//! `CliError` is what every command returns. Domain errors (`ConfigError`,
//! `BuildError`) convert into it via `#[from]`, and [`cli_error_to_miette`]
//! turns it into a rendered report at the binary boundary.

mod miette;

pub use self::miette::{build_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dev server failed to bind or run
    #[error("Server error: {0}")]
    Server(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration errors: loading, parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config sources could not be merged or deserialized
    #[error("Invalid configuration: {message}\n\nHint: Check beacon.config.json syntax, field names and BEACON_* variables")]
    Extract { message: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract {
            message: err.to_string(),
        }
    }
}

/// Build failures. All of them abort `beacon build` with exit code 1.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The script bundler reported compile errors; nothing was written
    #[error("Compile failed with {} error(s):\n{}", .0.len(), .0.join("\n"))]
    Compile(Vec<String>),

    /// The stylesheet compiler failed to spawn, timed out, or exited non-zero
    #[error("Stylesheet compilation failed: {0}\n\nHint: The shell always links the stylesheet, so the build cannot continue without it")]
    Stylesheet(#[source] beacon_bundler::Error),

    /// The shell's entry script is not on disk
    #[error("Entry script missing from build output: {}\n\nHint: Run the full build again", .0.display())]
    EntryMissing(PathBuf),

    /// A configured source file does not exist
    #[error("Source not found: {}\n\nHint: Check the 'entry' and 'stylesheet' fields in beacon.config.json", .0.display())]
    SourceNotFound(PathBuf),

    /// Writing or copying output failed
    #[error("Failed to write build output: {0}")]
    Output(#[source] beacon_bundler::Error),
}

impl From<beacon_bundler::Error> for BuildError {
    fn from(err: beacon_bundler::Error) -> Self {
        use beacon_bundler::Error as E;
        match err {
            E::Compile(messages) => BuildError::Compile(messages),
            E::SourceNotFound(path) => BuildError::SourceNotFound(path),
            E::EntryMissing(path) => BuildError::EntryMissing(path),
            err @ (E::StylesheetSpawn { .. }
            | E::StylesheetExit { .. }
            | E::StylesheetTimeout { .. }
            | E::StylesheetMissing(_)) => BuildError::Stylesheet(err),
            other => BuildError::Output(other),
        }
    }
}

impl From<beacon_bundler::Error> for CliError {
    fn from(err: beacon_bundler::Error) -> Self {
        CliError::Build(err.into())
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Context helpers for `Result`s that convert into `CliError`.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into `CliError::FileNotFound(path)`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
