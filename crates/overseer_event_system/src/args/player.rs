//! Player event payloads.

use std::sync::Arc;

use overseer_api::{Player, Role, RoleTypeId, SpawnReason};

use crate::{impl_deniable, impl_event};

/// A player finished authentication.
#[derive(Debug)]
pub struct VerifiedEvent {
    pub player: Arc<Player>,
}

impl VerifiedEvent {
    pub fn new(player: Arc<Player>) -> Self {
        Self { player }
    }
}

/// A player disconnected. Their surrogate is evicted after dispatch.
#[derive(Debug)]
pub struct LeftEvent {
    pub player: Arc<Player>,
}

impl LeftEvent {
    pub fn new(player: Arc<Player>) -> Self {
        Self { player }
    }
}

/// A player's role is about to change. Handlers may rewrite `new_role`.
#[derive(Debug)]
pub struct ChangingRoleEvent {
    pub player: Arc<Player>,
    pub old_role: RoleTypeId,
    pub new_role: RoleTypeId,
    pub reason: SpawnReason,
    pub is_allowed: bool,
}

impl ChangingRoleEvent {
    pub fn new(player: Arc<Player>, old_role: RoleTypeId, new_role: RoleTypeId, reason: SpawnReason) -> Self {
        Self {
            player,
            old_role,
            new_role,
            reason,
            is_allowed: true,
        }
    }
}

/// A player's role changed; `role` is the freshly built surrogate.
#[derive(Debug)]
pub struct ChangedRoleEvent {
    pub player: Arc<Player>,
    pub old_role: RoleTypeId,
    pub role: Option<Arc<Role>>,
}

impl ChangedRoleEvent {
    pub fn new(player: Arc<Player>, old_role: RoleTypeId, role: Option<Arc<Role>>) -> Self {
        Self { player, old_role, role }
    }
}

/// A player is about to take damage. Handlers may change `amount`.
#[derive(Debug)]
pub struct HurtingEvent {
    pub player: Arc<Player>,
    pub attacker: Option<Arc<Player>>,
    pub amount: f64,
    pub is_allowed: bool,
}

impl HurtingEvent {
    pub fn new(player: Arc<Player>, attacker: Option<Arc<Player>>, amount: f64) -> Self {
        Self {
            player,
            attacker,
            amount,
            is_allowed: true,
        }
    }
}

impl_event! {
    VerifiedEvent => "player:verified",
    LeftEvent => "player:left",
    ChangingRoleEvent => "player:changing_role",
    ChangedRoleEvent => "player:changed_role",
    HurtingEvent => "player:hurting",
}

impl_deniable!(ChangingRoleEvent, HurtingEvent);
