use serde::{Deserialize, Serialize};

/// How a bus treats a denied event that a later handler re-allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialPolicy {
    /// The flag is whatever the last handler left it as. A later handler
    /// may override an earlier denial. The bus never writes the flag.
    #[default]
    LastWriteWins,
    /// Once any handler denies, the bus restores the denial after every
    /// later handler and warns about the handler that tried to re-allow.
    Sticky,
}

/// Settings shared by every bus in an [`Events`](crate::Events) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    #[serde(default)]
    pub denial_policy: DenialPolicy,
    /// Log a warning when an event fires with nobody subscribed.
    #[serde(default)]
    pub warn_on_missing_handlers: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            denial_policy: DenialPolicy::LastWriteWins,
            warn_on_missing_handlers: false,
        }
    }
}
