//! Logging system setup and configuration.
//!
//! Human-readable or JSON output through `tracing-subscriber`; `RUST_LOG`
//! takes precedence over the configured level.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global subscriber. `json_format` forces JSON output
/// regardless of the configuration file.
pub fn setup_logging(config: &LoggingSettings, json_format: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║              👁️  OVERSEER 👁️               ║");
    info!("║              v{:<27}║", version);
    info!("║                                          ║");
    info!("║  🚌 Typed event buses                    ║");
    info!("║  🚫 Cooperative cancellation             ║");
    info!("║  🪞 Surrogates for host objects          ║");
    info!("║  🔌 Fault-isolated plugins               ║");
    info!("╚══════════════════════════════════════════╝");
}
