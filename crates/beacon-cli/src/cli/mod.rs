//! Command-line interface definition.
//!
//! Both subcommands take no arguments of their own. Paths, the dev server
//! address and build tweaks come from `beacon.config.json` and `BEACON_*`
//! environment variables (see [`crate::config`]).

use clap::{Parser, Subcommand};

/// Beacon - build and preview the streaming web client
#[derive(Parser, Debug)]
#[command(
    name = "beacon",
    version,
    about = "Build and preview the streaming web client",
    long_about = "Beacon compiles the web client into hashed bundles plus an HTML shell,\n\
                  and runs a local development server that stands in for the streaming\n\
                  backend with mock API payloads."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compile scripts and stylesheet, copy public assets, write index.html
    Build,

    /// Serve the build output with mock API routes and a WebSocket endpoint
    ///
    /// Requires a prior `beacon build`.
    Dev,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["beacon", "build"]).unwrap();
        assert_eq!(cli.command, Command::Build);
        assert!(!cli.verbose && !cli.quiet && !cli.no_color);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["beacon", "dev", "--verbose", "--no-color"]).unwrap();
        assert_eq!(cli.command, Command::Dev);
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["beacon", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn test_subcommands_take_no_arguments() {
        assert!(Cli::try_parse_from(["beacon", "build", "src/index.tsx"]).is_err());
        assert!(Cli::try_parse_from(["beacon", "dev", "--port", "4000"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["beacon"]).is_err());
    }
}
