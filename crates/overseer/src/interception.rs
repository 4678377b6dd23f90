//! # Interception Layer
//!
//! The host calls into an [`Interceptor`] at each point where an event
//! fires. Every entry point resolves host objects to surrogates, builds the
//! payload, invokes the bus and then applies whatever the handlers left in
//! the payload back onto the host.
//!
//! Destruction notifications evict the matching surrogate exactly once; a
//! second notification for the same host object is ignored.

use std::sync::Arc;

use overseer_api::{
    DanceType, DoorDamageType, HostDoor, HostPickup, HostPlayer, HostRagdoll, Pickup, Player, Ragdoll, Role,
    RoleTypeId, SpawnReason, SurrogateError, Surrogates,
};
use overseer_event_system::{
    ChangedRoleEvent, ChangingRoleEvent, DamagingDoorEvent, DancingEvent, DestroyedDoorEvent, DestroyingDoorEvent,
    Events, ExplodingGrenadeEvent, GeneratedEvent, HurtingEvent, LeftEvent, PickupAddedEvent, PickupDestroyedEvent,
    PlayingFootstepEvent, SendingCallEvent, VerifiedEvent,
};
use tracing::{debug, warn};

/// What happened to a door after a damage or destruction notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorOutcome {
    /// A handler denied the damage; health is unchanged.
    Denied,
    Damaged { remaining: f64 },
    /// Health ran out but a handler denied the destruction.
    Spared,
    Destroyed,
    /// The host door no longer exists.
    Gone,
}

#[derive(Debug, Clone)]
pub struct Interceptor {
    events: Arc<Events>,
    surrogates: Arc<Surrogates>,
}

impl Interceptor {
    pub fn new(events: Arc<Events>, surrogates: Arc<Surrogates>) -> Self {
        Self { events, surrogates }
    }

    pub fn events(&self) -> &Arc<Events> {
        &self.events
    }

    pub fn surrogates(&self) -> &Arc<Surrogates> {
        &self.surrogates
    }

    // Player

    pub fn player_verified(&self, host: &Arc<dyn HostPlayer>) -> Option<Arc<Player>> {
        let player = self.surrogates.player(Some(host))?;
        let mut event = VerifiedEvent::new(player.clone());
        self.events.player.verified.invoke_safely(&mut event);
        Some(player)
    }

    /// Raises `left` and evicts the player and their role. False if the
    /// player was never wrapped or was already evicted.
    pub fn player_left(&self, host: &Arc<dyn HostPlayer>) -> bool {
        let Some(player) = self.surrogates.lookup_player(host) else {
            debug!("Ignoring disconnect for unknown player {}", host.nickname());
            return false;
        };

        let mut event = LeftEvent::new(player);
        self.events.player.left.invoke_safely(&mut event);
        self.surrogates.remove_player(host).is_some()
    }

    /// Asks handlers whether `host` may become `new_role`. Returns the role
    /// the host should spawn, which handlers may have rewritten, or `None`
    /// when the change was denied.
    pub fn changing_role(
        &self,
        host: &Arc<dyn HostPlayer>,
        new_role: RoleTypeId,
        reason: SpawnReason,
    ) -> Option<RoleTypeId> {
        let player = self.surrogates.player(Some(host))?;
        let old_role = host.role().map_or(RoleTypeId::None, |role| role.role_type());

        let mut event = ChangingRoleEvent::new(player, old_role, new_role, reason);
        if self.events.player.changing_role.invoke_deniable(&mut event) {
            Some(event.new_role)
        } else {
            None
        }
    }

    /// Called after the host swapped the player's role object. Rebuilds the
    /// role surrogate and raises `changed_role`.
    pub fn role_changed(&self, host: &Arc<dyn HostPlayer>, old_role: RoleTypeId) -> Option<Arc<Role>> {
        let player = self.surrogates.player(Some(host))?;
        let host_role = host.role();
        let role = self.surrogates.change_role(&player, host_role.as_ref());

        let mut event = ChangedRoleEvent::new(player, old_role, role.clone());
        self.events.player.changed_role.invoke_safely(&mut event);
        role
    }

    /// Returns the damage actually dealt, `None` if denied.
    pub fn hurting(
        &self,
        target: &Arc<dyn HostPlayer>,
        attacker: Option<&Arc<dyn HostPlayer>>,
        amount: f64,
    ) -> Option<f64> {
        let player = self.surrogates.player(Some(target))?;
        let attacker = attacker.and_then(|host| self.surrogates.player(Some(host)));

        let mut event = HurtingEvent::new(player.clone(), attacker, amount);
        if !self.events.player.hurting.invoke_deniable(&mut event) {
            return None;
        }

        let dealt = event.amount.max(0.0);
        let remaining = (player.health()? - dealt).max(0.0);
        match player.set_health(remaining) {
            Ok(()) => Some(dealt),
            Err(e) => {
                warn!("⚠️ Could not apply {:.1} damage to {}: {}", dealt, player, e);
                None
            }
        }
    }

    // Map

    pub fn map_generated(&self, seed: i32) {
        let mut event = GeneratedEvent::new(seed);
        self.events.map.generated.invoke_safely(&mut event);
    }

    /// Applies `damage` to a door unless denied. A hit that takes the door to
    /// zero health continues into [`destroy_door`](Self::destroy_door).
    pub fn damage_door(&self, host: &Arc<dyn HostDoor>, damage: f64, damage_type: DoorDamageType) -> DoorOutcome {
        let Some(door) = self.surrogates.door(Some(host)) else {
            return DoorOutcome::Gone;
        };

        let mut event = DamagingDoorEvent::new(door.clone(), damage, damage_type);
        if !self.events.map.door_damaging.invoke_deniable(&mut event) {
            return DoorOutcome::Denied;
        }

        match door.damage(event.damage) {
            Ok(remaining) if remaining > 0.0 => DoorOutcome::Damaged { remaining },
            Ok(_) => self.destroy_door(host),
            Err(SurrogateError::HostGone(_)) => DoorOutcome::Gone,
            Err(e) => {
                warn!("⚠️ Rejected damage for door {}: {}", door, e);
                DoorOutcome::Denied
            }
        }
    }

    pub fn destroy_door(&self, host: &Arc<dyn HostDoor>) -> DoorOutcome {
        let Some(door) = self.surrogates.door(Some(host)) else {
            return DoorOutcome::Gone;
        };

        let mut event = DestroyingDoorEvent::new(door.clone());
        if !self.events.map.door_destroying.invoke_deniable(&mut event) {
            return DoorOutcome::Spared;
        }

        if door.destroy().is_err() {
            return DoorOutcome::Gone;
        }

        let mut event = DestroyedDoorEvent::new(door);
        self.events.map.door_destroyed.invoke_safely(&mut event);
        self.surrogates.remove_door(host);
        DoorOutcome::Destroyed
    }

    pub fn pickup_added(&self, host: &Arc<dyn HostPickup>) -> Option<Arc<Pickup>> {
        let pickup = self.surrogates.pickup(Some(host))?;
        let mut event = PickupAddedEvent::new(pickup.clone());
        self.events.map.pickup_added.invoke_safely(&mut event);
        Some(pickup)
    }

    /// Raises `pickup_destroyed` and evicts the surrogate. False if there
    /// was nothing to evict.
    pub fn pickup_destroyed(&self, host: &Arc<dyn HostPickup>) -> bool {
        let Some(pickup) = self.surrogates.lookup_pickup(host) else {
            return false;
        };

        let mut event = PickupDestroyedEvent::new(pickup);
        self.events.map.pickup_destroyed.invoke_safely(&mut event);
        self.surrogates.remove_pickup(host).is_some()
    }

    /// Detonates a grenade pickup unless denied. Returns the players the
    /// explosion should affect: those handlers left in the target list.
    pub fn exploding_grenade(
        &self,
        thrower: Option<&Arc<dyn HostPlayer>>,
        grenade: &Arc<dyn HostPickup>,
        nearby: &[Arc<dyn HostPlayer>],
    ) -> Vec<Arc<Player>> {
        let Some(pickup) = self.surrogates.pickup(Some(grenade)) else {
            return Vec::new();
        };

        let thrower = thrower.and_then(|host| self.surrogates.player(Some(host)));
        let targets = nearby
            .iter()
            .filter_map(|host| self.surrogates.player(Some(host)))
            .collect();
        let position = pickup.position().unwrap_or_default();

        let mut event = ExplodingGrenadeEvent::new(thrower, pickup.item_type(), position, targets);
        if !self.events.map.exploding_grenade.invoke_deniable(&mut event) {
            return Vec::new();
        }

        if let Some(live) = pickup.as_grenade() {
            if let Err(e) = live.explode() {
                warn!("⚠️ Grenade {} could not explode: {}", pickup, e);
            }
        }
        self.pickup_destroyed(grenade);
        event.targets
    }

    pub fn ragdoll_spawned(&self, host: &Arc<dyn HostRagdoll>) -> Option<Arc<Ragdoll>> {
        self.surrogates.ragdoll(Some(host))
    }

    pub fn ragdoll_removed(&self, host: &Arc<dyn HostRagdoll>) -> bool {
        self.surrogates.remove_ragdoll(host).is_some()
    }

    // SCP-049

    /// SCP-049 starts its call. Returns the duration written to the host, or
    /// `None` if denied or the player is not SCP-049.
    pub fn sending_call(&self, host: &Arc<dyn HostPlayer>, duration: f64) -> Option<f64> {
        let player = self.surrogates.player(Some(host))?;
        let role = self.surrogates.role_of(&player)?;
        role.as_scp049()?;

        let mut event = SendingCallEvent::new(player, role, duration);
        if !self.events.scp049.sending_call.invoke_deniable(&mut event) {
            return None;
        }

        let scp049 = event.scp049()?;
        match scp049.set_call_duration(event.duration) {
            Ok(()) => Some(event.duration),
            Err(e) => {
                warn!("⚠️ Could not start call for {}: {}", event.player, e);
                None
            }
        }
    }

    // SCP-3114

    /// SCP-3114 starts (`is_dancing`) or stops dancing. Returns the dance now
    /// playing on the host; a denied change restores the previous dance.
    pub fn dancing(&self, host: &Arc<dyn HostPlayer>, is_dancing: bool, dance: DanceType) -> Option<DanceType> {
        let player = self.surrogates.player(Some(host))?;
        let role = self.surrogates.role_of(&player)?;
        let previous = role.as_scp3114()?.dance_type();

        let mut event = DancingEvent::new(player, role, is_dancing, dance);
        if self.events.scp3114.dancing.invoke_deniable(&mut event) {
            return Some(event.dance_type());
        }

        if let Err(e) = event.set_dance_type(previous) {
            warn!("⚠️ Could not restore dance for {}: {}", event.player, e);
        }
        Some(previous)
    }

    // SCP-939

    /// Whether the SCP-939 `listener` gets to see the footstep of `walker`.
    pub fn playing_footstep(&self, walker: &Arc<dyn HostPlayer>, listener: &Arc<dyn HostPlayer>) -> bool {
        let (Some(player), Some(scp)) = (
            self.surrogates.player(Some(walker)),
            self.surrogates.player(Some(listener)),
        ) else {
            return false;
        };
        let Some(role) = self.surrogates.role_of(&scp) else {
            return false;
        };
        if role.as_scp939().is_none() {
            return false;
        }

        let mut event = PlayingFootstepEvent::new(player, role);
        self.events.scp939.playing_footstep.invoke_deniable(&mut event)
    }
}
