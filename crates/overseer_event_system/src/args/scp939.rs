use std::sync::Arc;

use overseer_api::{Player, Role, Scp939Role};

use crate::{impl_deniable, impl_event};

/// SCP-939 is about to be shown a footstep sound made by `player`.
#[derive(Debug)]
pub struct PlayingFootstepEvent {
    pub player: Arc<Player>,
    pub role: Arc<Role>,
    pub is_allowed: bool,
}

impl PlayingFootstepEvent {
    pub fn new(player: Arc<Player>, role: Arc<Role>) -> Self {
        Self {
            player,
            role,
            is_allowed: true,
        }
    }

    pub fn scp939(&self) -> Option<&Scp939Role> {
        self.role.as_scp939()
    }
}

impl_event!(PlayingFootstepEvent => "scp939:playing_footstep");
impl_deniable!(PlayingFootstepEvent);
