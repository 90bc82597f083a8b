//! Command implementations.
//!
//! - [`build`] - compile the web client and write the HTML shell
//! - [`dev`] - serve the build output against a mock backend
//!
//! Each command provides an `execute` function returning [`crate::Result`].

pub mod build;
pub mod dev;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
