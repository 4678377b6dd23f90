use std::sync::Arc;

use overseer_api::{Player, Role, Scp049Role};

use crate::{impl_deniable, impl_event};

/// SCP-049 is activating its call ability. Handlers may change `duration`.
#[derive(Debug)]
pub struct SendingCallEvent {
    pub player: Arc<Player>,
    pub role: Arc<Role>,
    pub duration: f64,
    pub is_allowed: bool,
}

impl SendingCallEvent {
    pub fn new(player: Arc<Player>, role: Arc<Role>, duration: f64) -> Self {
        Self {
            player,
            role,
            duration,
            is_allowed: true,
        }
    }

    pub fn scp049(&self) -> Option<&Scp049Role> {
        self.role.as_scp049()
    }
}

impl_event!(SendingCallEvent => "scp049:sending_call");
impl_deniable!(SendingCallEvent);
