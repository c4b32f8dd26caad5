use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Environment variable holding tracing filter directives.
pub const LOG_ENV: &str = "FORM_BUILDER_LOG";

/// Installs a stderr fmt subscriber so stdout stays machine readable.
///
/// `FORM_BUILDER_LOG` wins over `verbose`, which only moves the default
/// level from `warn` to `debug`.
pub fn init(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
