//! Diagnostic logging for the binary
//!
//! Reads `RUST_LOG`, defaulting to `info`. Output goes to stderr so stdout
//! carries only command results.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// # Errors
/// Returns error if a subscriber is already installed
pub(crate) fn init(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init()?;
    }
    Ok(())
}
