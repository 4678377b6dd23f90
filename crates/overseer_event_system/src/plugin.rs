//! In-process extensions.
//!
//! A [`Plugin`] subscribes to buses when enabled and must unsubscribe
//! everything it registered when disabled. The [`PluginManager`] isolates
//! every callback: an error or panic in one plugin is logged and the others
//! carry on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use overseer_api::Surrogates;
use tracing::{error, info};

use crate::handlers::Events;
use crate::system::panic_message;

/// What a plugin can reach: the buses and the surrogate hub.
#[derive(Debug, Clone)]
pub struct ExtensionContext {
    pub events: Arc<Events>,
    pub surrogates: Arc<Surrogates>,
}

impl ExtensionContext {
    pub fn new(events: Arc<Events>, surrogates: Arc<Surrogates>) -> Self {
        Self { events, surrogates }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Plugin {plugin} failed to enable: {reason}")]
    EnableFailed { plugin: String, reason: String },
    #[error("Plugin {plugin} failed to disable: {reason}")]
    DisableFailed { plugin: String, reason: String },
    #[error("Plugin {plugin} panicked: {message}")]
    Panicked { plugin: String, message: String },
}

pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn on_enabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError>;

    fn on_disabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError>;
}

struct PluginSlot {
    plugin: Box<dyn Plugin>,
    enabled: bool,
}

/// Owns registered plugins and drives their lifecycle in registration order.
pub struct PluginManager {
    context: ExtensionContext,
    plugins: Vec<PluginSlot>,
}

enum Phase {
    Enable,
    Disable,
}

impl PluginManager {
    pub fn new(context: ExtensionContext) -> Self {
        Self {
            context,
            plugins: Vec::new(),
        }
    }

    pub fn context(&self) -> &ExtensionContext {
        &self.context
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        if self.plugins.iter().any(|slot| slot.plugin.name() == plugin.name()) {
            return Err(PluginError::AlreadyRegistered(plugin.name().to_string()));
        }
        info!("📦 Registered plugin {} v{}", plugin.name(), plugin.version());
        self.plugins.push(PluginSlot { plugin, enabled: false });
        Ok(())
    }

    /// Enables every registered plugin that is not yet enabled. Returns how
    /// many were enabled by this call.
    pub fn enable_all(&mut self) -> usize {
        let mut enabled = 0;
        for slot in self.plugins.iter_mut().filter(|slot| !slot.enabled) {
            match Self::call(slot.plugin.as_mut(), &self.context, Phase::Enable) {
                Ok(()) => {
                    slot.enabled = true;
                    enabled += 1;
                    info!("✅ Enabled plugin {}", slot.plugin.name());
                }
                Err(e) => error!(plugin = slot.plugin.name(), "❌ {}", e),
            }
        }
        enabled
    }

    /// Disables enabled plugins in reverse registration order. A plugin
    /// whose `on_disabled` fails is still considered disabled.
    pub fn disable_all(&mut self) -> usize {
        let mut disabled = 0;
        for slot in self.plugins.iter_mut().rev().filter(|slot| slot.enabled) {
            slot.enabled = false;
            match Self::call(slot.plugin.as_mut(), &self.context, Phase::Disable) {
                Ok(()) => {
                    disabled += 1;
                    info!("🔌 Disabled plugin {}", slot.plugin.name());
                }
                Err(e) => error!(plugin = slot.plugin.name(), "❌ {}", e),
            }
        }
        disabled
    }

    fn call(plugin: &mut dyn Plugin, context: &ExtensionContext, phase: Phase) -> Result<(), PluginError> {
        let name = plugin.name().to_string();
        let outcome = catch_unwind(AssertUnwindSafe(|| match phase {
            Phase::Enable => plugin.on_enabled(context),
            Phase::Disable => plugin.on_disabled(context),
        }));

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(PluginError::Panicked {
                plugin: name,
                message: panic_message(panic.as_ref()),
            }),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|slot| slot.plugin.name().to_string()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.plugins
            .iter()
            .any(|slot| slot.enabled && slot.plugin.name() == name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager").field("plugins", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::GeneratedEvent;
    use crate::events::HandlerId;
    use std::sync::Mutex;

    fn context() -> ExtensionContext {
        ExtensionContext::new(Arc::new(Events::default()), Arc::new(Surrogates::new()))
    }

    struct Recorder {
        name: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        subscription: Option<HandlerId>,
        fail_enable: bool,
        panic_disable: bool,
    }

    impl Recorder {
        fn new(name: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                journal: journal.clone(),
                subscription: None,
                fail_enable: false,
                panic_disable: false,
            }
        }
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn version(&self) -> &str {
            "0.1.0"
        }

        fn on_enabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError> {
            if self.fail_enable {
                return Err(PluginError::EnableFailed {
                    plugin: self.name.to_string(),
                    reason: "refused".to_string(),
                });
            }
            self.journal.lock().unwrap().push(format!("enable {}", self.name));
            self.subscription = Some(context.events.map.generated.on(self.name, |_: &mut GeneratedEvent| Ok(())));
            Ok(())
        }

        fn on_disabled(&mut self, context: &ExtensionContext) -> Result<(), PluginError> {
            if let Some(id) = self.subscription.take() {
                context.events.map.generated.unsubscribe(id);
            }
            if self.panic_disable {
                panic!("disable exploded");
            }
            self.journal.lock().unwrap().push(format!("disable {}", self.name));
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PluginManager::new(context());
        manager.register(Box::new(Recorder::new("first", &journal))).unwrap();
        manager.register(Box::new(Recorder::new("second", &journal))).unwrap();

        assert_eq!(manager.enable_all(), 2);
        assert_eq!(manager.context().events.map.generated.handler_count(), 2);
        assert!(manager.is_enabled("first"));

        assert_eq!(manager.disable_all(), 2);
        assert!(manager.context().events.map.generated.is_empty());
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["enable first", "enable second", "disable second", "disable first"]
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PluginManager::new(context());
        manager.register(Box::new(Recorder::new("dup", &journal))).unwrap();
        let err = manager.register(Box::new(Recorder::new("dup", &journal))).unwrap_err();
        assert!(matches!(err, PluginError::AlreadyRegistered(name) if name == "dup"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_failing_plugins_do_not_stop_others() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = PluginManager::new(context());

        let mut refusing = Recorder::new("refusing", &journal);
        refusing.fail_enable = true;
        let mut panicking = Recorder::new("panicking", &journal);
        panicking.panic_disable = true;

        manager.register(Box::new(refusing)).unwrap();
        manager.register(Box::new(panicking)).unwrap();
        manager.register(Box::new(Recorder::new("steady", &journal))).unwrap();

        assert_eq!(manager.enable_all(), 2);
        assert!(!manager.is_enabled("refusing"));

        assert_eq!(manager.disable_all(), 1);
        assert!(!manager.is_enabled("panicking"));
        assert!(manager.context().events.map.generated.is_empty());
        assert_eq!(*journal.lock().unwrap(), vec!["enable panicking", "enable steady", "disable steady"]);
    }
}
