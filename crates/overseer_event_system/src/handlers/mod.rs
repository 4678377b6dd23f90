//! # Events Registry
//!
//! Every event kind has exactly one [`EventBus`](crate::EventBus), grouped by
//! subsystem. [`Events`] owns all groups; the host integration creates one at
//! startup, shares it with plugins through an `Arc`, and clears it at
//! shutdown.

pub mod map;
pub mod player;
pub mod scp049;
pub mod scp3114;
pub mod scp939;

pub use map::MapHandlers;
pub use player::PlayerHandlers;
pub use scp049::Scp049Handlers;
pub use scp3114::Scp3114Handlers;
pub use scp939::Scp939Handlers;

use serde::Serialize;
use tracing::info;

use crate::system::{BusReport, EventSettings};

/// Process-scoped owner of every event bus.
#[derive(Debug)]
pub struct Events {
    pub player: PlayerHandlers,
    pub map: MapHandlers,
    pub scp049: Scp049Handlers,
    pub scp3114: Scp3114Handlers,
    pub scp939: Scp939Handlers,
    settings: EventSettings,
}

/// Summary of every bus, serialisable for monitoring output.
#[derive(Debug, Clone, Serialize)]
pub struct EventsReport {
    pub total_handlers: usize,
    pub total_invocations: u64,
    pub total_faults: u64,
    pub total_panics: u64,
    pub buses: Vec<BusReport>,
}

impl EventsReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Events {
    pub fn new(settings: EventSettings) -> Self {
        info!(
            "🚌 Event buses ready (denial policy: {:?}, warn on missing handlers: {})",
            settings.denial_policy, settings.warn_on_missing_handlers
        );
        Self {
            player: PlayerHandlers::new(&settings),
            map: MapHandlers::new(&settings),
            scp049: Scp049Handlers::new(&settings),
            scp3114: Scp3114Handlers::new(&settings),
            scp939: Scp939Handlers::new(&settings),
            settings,
        }
    }

    pub fn settings(&self) -> &EventSettings {
        &self.settings
    }

    pub fn handler_count(&self) -> usize {
        self.player.handler_count()
            + self.map.handler_count()
            + self.scp049.handler_count()
            + self.scp3114.handler_count()
            + self.scp939.handler_count()
    }

    /// Drops every subscription on every bus.
    pub fn clear(&self) {
        let count = self.handler_count();
        self.player.clear();
        self.map.clear();
        self.scp049.clear();
        self.scp3114.clear();
        self.scp939.clear();
        info!("🧹 Cleared {} event handlers", count);
    }

    pub fn report(&self) -> EventsReport {
        let buses: Vec<BusReport> = [
            self.player.report(),
            self.map.report(),
            self.scp049.report(),
            self.scp3114.report(),
            self.scp939.report(),
        ]
        .into_iter()
        .flatten()
        .collect();

        EventsReport {
            total_handlers: buses.iter().map(|bus| bus.handlers).sum(),
            total_invocations: buses.iter().map(|bus| bus.stats.invocations).sum(),
            total_faults: buses.iter().map(|bus| bus.stats.faults).sum(),
            total_panics: buses.iter().map(|bus| bus.stats.panics).sum(),
            buses,
        }
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new(EventSettings::default())
    }
}
