//! # Surrogate Hub
//!
//! One process-scoped owner for every wrapper registry and the role factory.
//! The interception layer pulls surrogates through it when building event
//! payloads and calls the matching `remove_*` when the host destroys an
//! entity.

use std::sync::Arc;

use tracing::{debug, info};

use crate::door::Door;
use crate::host::{HostDoor, HostKey, HostPickup, HostPlayer, HostRagdoll, HostRole};
use crate::pickups::Pickup;
use crate::player::Player;
use crate::pool::SetPool;
use crate::ragdoll::Ragdoll;
use crate::registry::WrapperRegistry;
use crate::roles::{Role, RoleFactory, RoleTypeId};

/// Entry counts per registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SurrogateCounts {
    pub players: usize,
    pub roles: usize,
    pub pickups: usize,
    pub ragdolls: usize,
    pub doors: usize,
}

#[derive(Debug)]
pub struct Surrogates {
    players: WrapperRegistry<HostKey, Player>,
    pickups: WrapperRegistry<HostKey, Pickup>,
    ragdolls: WrapperRegistry<HostKey, Ragdoll>,
    doors: WrapperRegistry<HostKey, Door>,
    roles: RoleFactory,
    set_pool: Arc<SetPool<HostKey>>,
}

impl Surrogates {
    pub fn new() -> Self {
        let set_pool = Arc::new(SetPool::default());
        Self {
            players: WrapperRegistry::new("players"),
            pickups: WrapperRegistry::new("pickups"),
            ragdolls: WrapperRegistry::new("ragdolls"),
            doors: WrapperRegistry::new("doors"),
            roles: RoleFactory::new(set_pool.clone()),
            set_pool,
        }
    }

    /// Surrogate for a connected player, created on first access.
    pub fn player(&self, host: Option<&Arc<dyn HostPlayer>>) -> Option<Arc<Player>> {
        self.players.get_or_wrap(host, Player::new)
    }

    pub fn lookup_player(&self, host: &Arc<dyn HostPlayer>) -> Option<Arc<Player>> {
        self.players.lookup_host(host)
    }

    /// Finds a player surrogate by the host's player id.
    pub fn player_by_id(&self, id: u32) -> Option<Arc<Player>> {
        self.players
            .entries()
            .into_iter()
            .map(|(_, player)| player)
            .find(|player| player.id() == id)
    }

    pub fn players(&self) -> Vec<Arc<Player>> {
        self.players.entries().into_iter().map(|(_, player)| player).collect()
    }

    /// Whether `player` is the surrogate currently registered for its host.
    /// False for surrogates evicted by [`remove_player`](Self::remove_player).
    pub fn is_registered(&self, player: &Arc<Player>) -> bool {
        self.players
            .lookup(&player.key())
            .is_some_and(|current| Arc::ptr_eq(&current, player))
    }

    /// Evicts a disconnected player along with their role.
    pub fn remove_player(&self, host: &Arc<dyn HostPlayer>) -> Option<Arc<Player>> {
        let removed = self.players.remove_host(host)?;
        self.roles.remove(&removed);
        debug!("👋 Released surrogates for {}", removed);
        Some(removed)
    }

    pub fn pickup(&self, host: Option<&Arc<dyn HostPickup>>) -> Option<Arc<Pickup>> {
        self.pickups.get_or_wrap(host, Pickup::new)
    }

    pub fn lookup_pickup(&self, host: &Arc<dyn HostPickup>) -> Option<Arc<Pickup>> {
        self.pickups.lookup_host(host)
    }

    pub fn remove_pickup(&self, host: &Arc<dyn HostPickup>) -> Option<Arc<Pickup>> {
        self.pickups.remove_host(host)
    }

    pub fn ragdoll(&self, host: Option<&Arc<dyn HostRagdoll>>) -> Option<Arc<Ragdoll>> {
        self.ragdolls.get_or_wrap(host, Ragdoll::new)
    }

    pub fn remove_ragdoll(&self, host: &Arc<dyn HostRagdoll>) -> Option<Arc<Ragdoll>> {
        self.ragdolls.remove_host(host)
    }

    pub fn door(&self, host: Option<&Arc<dyn HostDoor>>) -> Option<Arc<Door>> {
        self.doors.get_or_wrap(host, Door::new)
    }

    pub fn remove_door(&self, host: &Arc<dyn HostDoor>) -> Option<Arc<Door>> {
        self.doors.remove_host(host)
    }

    /// Rebuilds `player`'s role surrogate for the host role object they now
    /// hold. A missing host role maps to `RoleTypeId::None`. Evicted player
    /// surrogates get no role.
    pub fn change_role(&self, player: &Arc<Player>, host_role: Option<&Arc<dyn HostRole>>) -> Option<Arc<Role>> {
        if !self.is_registered(player) {
            debug!("Ignoring role change for evicted surrogate {}", player);
            return None;
        }
        let role_type = host_role.map_or(RoleTypeId::None, |role| role.role_type());
        self.roles.create(role_type, host_role, player)
    }

    /// The active role surrogate, building it from the host's current role
    /// object if none has been created yet.
    pub fn role_of(&self, player: &Arc<Player>) -> Option<Arc<Role>> {
        if !self.is_registered(player) {
            return None;
        }
        if let Some(role) = self.roles.current(player) {
            return Some(role);
        }

        let host = player.host()?;
        let host_role = host.role();
        self.change_role(player, host_role.as_ref())
    }

    /// The player SCP-049 is currently sensing, if `scp049` is SCP-049 and
    /// its target is still wrapped.
    pub fn sense_target_of(&self, scp049: &Arc<Player>) -> Option<Arc<Player>> {
        let role = self.role_of(scp049)?;
        let target = role.as_scp049()?.sense_target()?;
        self.player_by_id(target)
    }

    pub fn roles(&self) -> &RoleFactory {
        &self.roles
    }

    pub fn set_pool(&self) -> &Arc<SetPool<HostKey>> {
        &self.set_pool
    }

    pub fn counts(&self) -> SurrogateCounts {
        SurrogateCounts {
            players: self.players.len(),
            roles: self.roles.len(),
            pickups: self.pickups.len(),
            ragdolls: self.ragdolls.len(),
            doors: self.doors.len(),
        }
    }

    /// Tears down every surrogate. Used at shutdown.
    pub fn clear(&self) {
        let counts = self.counts();
        self.roles.clear();
        self.players.clear();
        self.pickups.clear();
        self.ragdolls.clear();
        self.doors.clear();
        info!(
            "🧹 Released {} players, {} roles, {} pickups, {} ragdolls, {} doors",
            counts.players, counts.roles, counts.pickups, counts.ragdolls, counts.doors
        );
    }
}

impl Default for Surrogates {
    fn default() -> Self {
        Self::new()
    }
}
