//! # Overseer - Host Integration
//!
//! Wires the event registry, the surrogate hub and the plugins to a host.
//! The host shipped here is simulated: a tick loop drives in-process
//! players through the [`interception`] layer exactly as a game server
//! would.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (writes config.toml if missing)
//! overseer
//!
//! # Short debug session where denials cannot be overridden
//! overseer --ticks 20 --log-level debug --sticky-denials
//!
//! # JSON logging
//! overseer --json-logs
//! ```
//!
//! ## Signal Handling
//!
//! SIGINT/SIGTERM stop the tick loop after the current tick; a second signal
//! exits immediately.

pub mod app;
pub mod cli;
pub mod config;
pub mod interception;
pub mod logging;
pub mod signals;
pub mod simulation;

use tracing::error;

use app::{apply_overrides, Application};
use cli::CliArgs;
use config::AppConfig;

/// Parses arguments, loads configuration, sets up logging and runs one
/// host session.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match AppConfig::load_from_file(&args.config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠️ Failed to load {}: {e}; using defaults", args.config_path.display());
            AppConfig::default()
        }
    };
    apply_overrides(&mut config, &args);

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use config::{ConfigError, LoggingSettings, SimulationSettings, TuningSettings};
pub use interception::{DoorOutcome, Interceptor};
pub use simulation::{HostSession, SessionSummary};
