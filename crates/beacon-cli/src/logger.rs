//! Tracing subscriber setup.
//!
//! Verbosity is decided in this order:
//! 1. `--verbose`: debug for the beacon crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the beacon crates
//!
//! ```rust,no_run
//! use beacon_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("starting build");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "beacon=debug,beacon_bundler=debug,beacon_cli=debug,tower_http=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "beacon=info,beacon_bundler=info,beacon_cli=info";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_filters_parse() {
        let _ = EnvFilter::new(VERBOSE_FILTER);
        let _ = EnvFilter::new(QUIET_FILTER);
        let _ = EnvFilter::new(DEFAULT_FILTER);
    }

    #[test]
    #[serial]
    fn test_verbose_wins_over_rust_log() {
        unsafe { std::env::set_var("RUST_LOG", "off") };
        let filter = filter_for(true, false).to_string();
        assert!(filter.contains("beacon_cli=debug"));
        unsafe { std::env::remove_var("RUST_LOG") };
    }

    #[test]
    #[serial]
    fn test_default_reads_rust_log() {
        unsafe { std::env::set_var("RUST_LOG", "beacon_cli=trace") };
        let filter = filter_for(false, false).to_string();
        assert!(filter.contains("beacon_cli=trace"));
        unsafe { std::env::remove_var("RUST_LOG") };
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
