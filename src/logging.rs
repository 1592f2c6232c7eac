//! Tracing subscriber setup for the command-line front end.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive implied by the `-q`/`-v` flags.
///
/// `RUST_LOG` wins over this when set.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info,pcmforge=debug",
        _ => "debug,pcmforge=trace",
    }
}

/// Install the global subscriber. Logs go to stderr so converted audio and
/// `--json` reports on stdout stay clean.
pub fn init_logging(verbose: u8, quiet: bool, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose >= 2),
            )
            .init();
    }
}
