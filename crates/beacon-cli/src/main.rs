//! Beacon CLI entry point.

use beacon_cli::{cli, commands, error, logger, ui};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build => commands::build_execute().await,
        cli::Command::Dev => commands::dev_execute().await,
    };

    result.map_err(error::cli_error_to_miette)
}
