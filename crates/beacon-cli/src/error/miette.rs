//! Conversion of CLI errors into miette reports.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a `CliError` into a rendered report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a `BuildError` into a rendered report.
///
/// Bundler errors keep their own diagnostic codes and help text.
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Compile(messages) => Report::new(beacon_bundler::Error::Compile(messages)),
        BuildError::Stylesheet(e) | BuildError::Output(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_compile_report_keeps_code() {
        let report = build_error_to_miette(BuildError::Compile(vec!["x.ts: bad".into()]));
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("beacon::build::compile"));
    }

    #[test]
    fn test_plain_report_message() {
        let report = cli_error_to_miette(CliError::Build(BuildError::EntryMissing(
            PathBuf::from("dist/assets/index-1.js"),
        )));
        assert!(report.to_string().contains("dist/assets/index-1.js"));
    }
}
