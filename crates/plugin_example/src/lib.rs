//! Example extension.
//!
//! Greets every verified player and refuses to let a door break while it
//! still has health left. Every subscription id is kept so `on_disabled`
//! removes exactly what `on_enabled` added.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use overseer_event_system::{
    Deniable, DestroyingDoorEvent, ExtensionContext, HandlerId, Plugin, PluginError, VerifiedEvent,
};
use tracing::info;

pub struct ExamplePlugin {
    greeting: HandlerId,
    door_guard: HandlerId,
    subscribed: bool,
    greeted: Arc<AtomicU64>,
    doors_saved: Arc<AtomicU64>,
}

impl ExamplePlugin {
    pub fn new() -> Self {
        Self {
            greeting: HandlerId(0),
            door_guard: HandlerId(0),
            subscribed: false,
            greeted: Arc::new(AtomicU64::new(0)),
            doors_saved: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Players greeted since the plugin was created.
    pub fn greeted(&self) -> u64 {
        self.greeted.load(Ordering::Relaxed)
    }

    /// Destruction attempts this plugin denied.
    pub fn doors_saved(&self) -> u64 {
        self.doors_saved.load(Ordering::Relaxed)
    }
}

impl Default for ExamplePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ExamplePlugin {
    fn name(&self) -> &str {
        "example"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn on_enabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError> {
        if self.subscribed {
            return Ok(());
        }

        let greeted = self.greeted.clone();
        self.greeting = context.events.player.verified.on("example::greeting", move |event: &mut VerifiedEvent| {
            info!("{} has joined the server!", event.player);
            greeted.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });

        let doors_saved = self.doors_saved.clone();
        self.door_guard = context
            .events
            .map
            .door_destroying
            .on("example::door_guard", move |event: &mut DestroyingDoorEvent| {
                if event.health() > 0.0 {
                    event.deny();
                    doors_saved.fetch_add(1, Ordering::Relaxed);
                    info!("🚪 Kept {} standing with {:.0} health left", event.door, event.health());
                }
                Ok(())
            });

        self.subscribed = true;
        Ok(())
    }

    fn on_disabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError> {
        if !self.subscribed {
            return Ok(());
        }
        self.subscribed = false;

        let greeting = context.events.player.verified.unsubscribe(self.greeting);
        let door_guard = context.events.map.door_destroying.unsubscribe(self.door_guard);
        if greeting && door_guard {
            Ok(())
        } else {
            Err(PluginError::DisableFailed {
                plugin: self.name().to_string(),
                reason: "a subscription was already gone".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overseer_api::host::{HostDoor, HostPlayer};
    use overseer_api::mock::{MockDoor, MockPlayer};
    use overseer_api::Surrogates;
    use overseer_event_system::Events;

    fn context() -> ExtensionContext {
        ExtensionContext::new(Arc::new(Events::default()), Arc::new(Surrogates::new()))
    }

    #[test]
    fn test_greets_verified_players() {
        let context = context();
        let mut plugin = ExamplePlugin::new();
        plugin.on_enabled(&context).unwrap();

        let host: Arc<dyn HostPlayer> = MockPlayer::new(7, "Dr. Bright");
        let player = context.surrogates.player(Some(&host)).unwrap();
        let mut event = VerifiedEvent::new(player);
        context.events.player.verified.invoke_safely(&mut event);

        assert_eq!(plugin.greeted(), 1);
    }

    #[test]
    fn test_door_guard_only_saves_doors_with_health() {
        let context = context();
        let mut plugin = ExamplePlugin::new();
        plugin.on_enabled(&context).unwrap();

        let sturdy: Arc<dyn HostDoor> = MockDoor::new("LCZ_CAFE", 5.0);
        let broken: Arc<dyn HostDoor> = MockDoor::new("LCZ_WC", 0.0);

        let mut event = DestroyingDoorEvent::new(context.surrogates.door(Some(&sturdy)).unwrap());
        assert!(!context.events.map.door_destroying.invoke_deniable(&mut event));

        let mut event = DestroyingDoorEvent::new(context.surrogates.door(Some(&broken)).unwrap());
        assert!(context.events.map.door_destroying.invoke_deniable(&mut event));

        assert_eq!(plugin.doors_saved(), 1);
    }

    #[test]
    fn test_disable_removes_every_subscription() {
        let context = context();
        let mut plugin = ExamplePlugin::new();
        plugin.on_enabled(&context).unwrap();
        plugin.on_enabled(&context).unwrap();
        assert_eq!(context.events.handler_count(), 2);

        plugin.on_disabled(&context).unwrap();
        assert_eq!(context.events.handler_count(), 0);
        plugin.on_disabled(&context).unwrap();
    }
}
