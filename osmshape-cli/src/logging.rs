//! Log subscriber set-up for the osmshape binary.
//!
//! Library crates emit records through the `log` facade; the subscriber
//! installed here bridges them into `tracing` and writes them to stderr so
//! stdout stays free for command output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::CliError;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "OSMSHAPE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global log subscriber.
///
/// The filter is read from [`LOG_ENV`] (for example `OSMSHAPE_LOG=debug`)
/// and defaults to `info`.
pub fn init_logging() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
