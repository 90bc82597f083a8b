//! Beacon CLI: asset builds and a local development server for the
//! streaming web client.
//!
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status lines and spinners
//! - [`config`] - layered configuration
//! - `commands` - `beacon build` and `beacon dev`
//! - `dev` - the mock-backend dev server
//!
//! ```rust,no_run
//! use beacon_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
