//! # beacon-bundler
//!
//! Asset pipeline for the beacon web client.
//!
//! A build runs in two ordered stages:
//!
//! 1. [`AssetBuilder`] compiles the application entry module with Rolldown into
//!    content-hashed chunks, runs the utility-class stylesheet compiler and
//!    copies the public assets. It returns a [`BuildManifest`].
//! 2. [`ShellGenerator`] turns the manifest into `index.html`, an HTML shell
//!    carrying the four [`TemplateToken`] markers that the backend (or the
//!    local dev server) substitutes at request time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use beacon_bundler::{AssetBuilder, BuildOptions, ShellGenerator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = BuildOptions::new("/path/to/web");
//! let manifest = AssetBuilder::new(options.clone()).build().await?;
//!
//! let shell = ShellGenerator::new(&options.entry_marker);
//! shell.write(&options.out_dir, &manifest)?;
//! # Ok(()) }
//! ```
//!
//! ## Substituting tokens
//!
//! ```
//! use beacon_bundler::TokenValues;
//!
//! let values = TokenValues {
//!     name: "My Stream".into(),
//!     nonce: "abc123".into(),
//!     server_config_json: "{}".into(),
//!     status_json: "{}".into(),
//! };
//! let html = values.apply("<title>{{.Name}}</title>");
//! assert_eq!(html, "<title>My Stream</title>");
//! ```

pub mod builder;
pub mod bundler;
pub mod manifest;
pub mod options;
pub mod shell;
pub mod stylesheet;
pub mod tokens;
pub mod writer;

pub use builder::{AssetBuilder, BuildStage};
pub use bundler::{BundledFile, RolldownBundler, ScriptBundler};
pub use manifest::{AssetKind, BuildManifest, ManifestEntry};
pub use options::BuildOptions;
pub use shell::{select_entry, EntrySelection, ShellGenerator, DEFAULT_ENTRY_PATH, SHELL_FILE_NAME};
pub use stylesheet::{PackageManager, StylesheetCompiler, TailwindCli};
pub use tokens::{TemplateToken, TokenValues};

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the asset pipeline.
///
/// Every variant is fatal for the build that produced it; nothing here is
/// retried.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The script bundler reported one or more compile errors.
    #[error("Compile failed with {} error(s):\n{}", .0.len(), .0.join("\n"))]
    #[diagnostic(
        code(beacon::build::compile),
        help("Fix the reported errors; no output from this build was written")
    )]
    Compile(Vec<String>),

    /// The stylesheet compiler could not be spawned.
    #[error("Failed to spawn stylesheet compiler `{command}`: {source}")]
    #[diagnostic(
        code(beacon::css::spawn_failed),
        help("Install the stylesheet compiler: npm install -D @tailwindcss/cli")
    )]
    StylesheetSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The stylesheet compiler exited with a non-zero status.
    #[error("Stylesheet compiler exited with code {exit_code}")]
    #[diagnostic(code(beacon::css::exit))]
    StylesheetExit {
        exit_code: i32,
        #[help]
        stderr: String,
    },

    /// The stylesheet compiler did not finish in time.
    #[error("Stylesheet compiler timed out after {timeout_secs} seconds")]
    #[diagnostic(code(beacon::css::timeout))]
    StylesheetTimeout { timeout_secs: u64 },

    /// The stylesheet compiler reported success but wrote nothing.
    #[error("Stylesheet compiler did not produce {}", .0.display())]
    #[diagnostic(code(beacon::css::missing_output))]
    StylesheetMissing(PathBuf),

    /// A required source file does not exist.
    #[error("Source not found: {}", .0.display())]
    #[diagnostic(code(beacon::build::source_not_found))]
    SourceNotFound(PathBuf),

    /// The entry chunk picked for the shell is not on disk.
    #[error("Entry chunk {} is missing from the output directory", .0.display())]
    #[diagnostic(
        code(beacon::shell::entry_missing),
        help("The shell is generated from the build output; run the full build again")
    )]
    EntryMissing(PathBuf),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    #[diagnostic(code(beacon::write::invalid_path))]
    InvalidOutputPath(String),

    /// I/O error with context message.
    #[error("{message}")]
    #[diagnostic(code(beacon::io))]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(beacon::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an I/O error with a message naming the operation and path.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }

    /// Convert a batch of Rolldown diagnostics into a compile error.
    ///
    /// Rolldown's diagnostic types are not part of its stable surface, so the
    /// batch is rendered through `Debug` and split per diagnostic.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        let rendered = format!("{:#?}", error);
        let messages = rendered
            .split("BuildDiagnostic")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty() && *chunk != "[" && *chunk != "]")
            .map(str::to_string)
            .collect::<Vec<_>>();

        if messages.is_empty() {
            Error::Compile(vec![rendered])
        } else {
            Error::Compile(messages)
        }
    }
}

/// Result type alias for beacon-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;
