//! Tracing initialization (fmt subscriber + env filter).
//!
//! Log verbosity is controlled through the standard `RUST_LOG` environment
//! variable and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=tagreg=debug,sqlx=warn tagreg
//! ```

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for console logging
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");

    Ok(())
}
