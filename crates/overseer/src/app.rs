//! Application lifecycle: wiring, the simulated session and shutdown.

use std::sync::Arc;

use overseer_api::Surrogates;
use overseer_event_system::{DenialPolicy, Events, ExtensionContext, PluginManager, ShutdownState};
use plugin_example::ExamplePlugin;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::interception::Interceptor;
use crate::logging::display_banner;
use crate::signals::spawn_signal_watcher;
use crate::simulation::{HostSession, SessionSummary};

/// Owns the event registry, the surrogate hub and the plugins for one
/// host session.
pub struct Application {
    config: AppConfig,
    events: Arc<Events>,
    surrogates: Arc<Surrogates>,
    plugins: PluginManager,
}

/// Folds command-line overrides into the loaded configuration.
pub fn apply_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if args.sticky_denials {
        config.events.denial_policy = DenialPolicy::Sticky;
    }
}

impl Application {
    /// Validates `config` and builds every process-scoped component.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration validated successfully");

        let events = Arc::new(Events::new(config.events));
        let surrogates = Arc::new(Surrogates::new());
        let mut plugins = PluginManager::new(ExtensionContext::new(events.clone(), surrogates.clone()));
        plugins.register(Box::new(ExamplePlugin::new()))?;

        Ok(Self {
            config,
            events,
            surrogates,
            plugins,
        })
    }

    pub fn events(&self) -> &Arc<Events> {
        &self.events
    }

    /// Runs the session until its last tick or a shutdown signal, then tears
    /// everything down in reverse order of construction.
    pub async fn run(mut self) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        display_banner();
        self.log_configuration_summary();

        let enabled = self.plugins.enable_all();
        info!("🔌 {} of {} plugins enabled", enabled, self.plugins.len());
        info!("📊 {} handlers registered", self.events.handler_count());

        let shutdown_state = ShutdownState::new();
        let watcher = spawn_signal_watcher(shutdown_state.clone());

        let interceptor = Interceptor::new(self.events.clone(), self.surrogates.clone());
        let mut session = HostSession::new(interceptor, self.config.simulation.clone(), self.config.tuning.clone());
        let summary = session.run(&shutdown_state).await;

        watcher.abort();
        shutdown_state.initiate_shutdown();
        shutdown_state.complete_shutdown();

        info!("🔌 Shutting down plugins...");
        let disabled = self.plugins.disable_all();
        if disabled < enabled {
            warn!("⚠️ {} plugins did not disable cleanly", enabled - disabled);
        }

        self.log_final_statistics(&summary);

        self.events.clear();
        self.surrogates.clear();
        info!("✅ Overseer shutdown complete");
        Ok(summary)
    }

    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🚫 Denial policy: {:?}", self.config.events.denial_policy);
        info!(
            "  ⏱️ {} ticks every {}ms",
            self.config.simulation.ticks, self.config.simulation.tick_interval_ms
        );
        info!("  👥 Simulated players: {}", self.config.simulation.players);
        info!("  💣 Grenade fuse: {:.1}s", self.config.tuning.grenade_fuse_time);
    }

    fn log_final_statistics(&self, summary: &SessionSummary) {
        let report = self.events.report();
        info!("📊 Final Statistics:");
        info!("  - Ticks simulated: {}", summary.ticks);
        info!("  - Players joined/left: {}/{}", summary.joined, summary.left);
        info!("  - Events raised: {}", report.total_invocations);
        info!("  - Handlers registered: {}", report.total_handlers);
        info!("  - Handler faults: {} ({} panics)", report.total_faults, report.total_panics);

        for bus in report.buses.iter().filter(|bus| bus.stats.invocations > 0) {
            info!(
                "  - {}: {} invocations, {} denied",
                bus.event, bus.stats.invocations, bus.stats.denials
            );
        }

        match report.to_json() {
            Ok(json) => debug!("Event report: {}", json),
            Err(e) => warn!("⚠️ Could not serialize event report: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn quick_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.simulation.tick_interval_ms = 1;
        config.simulation.ticks = 16;
        config.simulation.players = 3;
        config
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            config_path: PathBuf::from("config.toml"),
            log_level: Some("debug".to_string()),
            json_logs: true,
            ticks: Some(3),
            sticky_denials: true,
        };

        apply_overrides(&mut config, &args);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.simulation.ticks, 3);
        assert_eq!(config.events.denial_policy, DenialPolicy::Sticky);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = quick_config();
        config.tuning.scp049_sense_distance = -5.0;
        assert!(Application::new(config).is_err());
    }

    #[tokio::test]
    async fn test_session_tears_down_cleanly() {
        let app = Application::new(quick_config()).unwrap();
        let events = app.events().clone();

        let summary = app.run().await.unwrap();

        assert_eq!(summary.ticks, 16);
        assert_eq!(summary.joined, 3);
        assert_eq!(summary.left, 3);
        assert_eq!(events.handler_count(), 0);
        assert!(events.report().total_invocations > 0);
    }
}
