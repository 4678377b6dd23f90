//! # Role Factory
//!
//! Builds the role surrogate matching a role type and keeps exactly one per
//! player, keyed by the player's identity and role slot rather than by the
//! host role object (which the host destroys on every role change).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::host::{HostKey, HostRef, HostRole};
use crate::player::Player;
use crate::pool::SetPool;
use crate::registry::WrapperRegistry;

use super::fpc::FpcRole;
use super::role::{GenericRole, Role, RoleKind};
use super::scp049::Scp049Role;
use super::scp3114::Scp3114Role;
use super::scp939::Scp939Role;
use super::types::RoleTypeId;

/// Slot holding a player's active role.
pub const ACTIVE_ROLE_SLOT: u8 = 0;

/// Registry key for a player's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleKey {
    pub player: HostKey,
    pub slot: u8,
}

impl RoleKey {
    pub fn active(player: HostKey) -> Self {
        Self { player, slot: ACTIVE_ROLE_SLOT }
    }
}

/// Surrogate family a role type is built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFamily {
    None,
    Spectator,
    Human,
    Scp049,
    Scp3114,
    Scp939,
    Generic,
}

impl RoleFamily {
    pub fn of(role_type: RoleTypeId) -> Self {
        use RoleTypeId::*;
        match role_type {
            None => RoleFamily::None,
            Spectator | Overwatch | Filmmaker | Destroyed => RoleFamily::Spectator,
            ClassD | Scientist | FacilityGuard | NtfPrivate | NtfSergeant | NtfSpecialist | NtfCaptain
            | ChaosConscript | ChaosRifleman | ChaosMarauder | ChaosRepressor | Tutorial => RoleFamily::Human,
            Scp049 => RoleFamily::Scp049,
            Scp3114 => RoleFamily::Scp3114,
            Scp939 => RoleFamily::Scp939,
            _ => RoleFamily::Generic,
        }
    }
}

/// Creates and tracks role surrogates.
#[derive(Debug)]
pub struct RoleFactory {
    roles: WrapperRegistry<RoleKey, Role>,
    pool: Arc<SetPool<HostKey>>,
}

impl RoleFactory {
    pub fn new(pool: Arc<SetPool<HostKey>>) -> Self {
        Self {
            roles: WrapperRegistry::new("roles"),
            pool,
        }
    }

    /// Builds a fresh surrogate for `player`'s new role and makes it the
    /// active one, evicting (and tearing down) whatever was active before.
    ///
    /// Every role type except `None` needs a live host role object; without
    /// one the previous surrogate is still evicted and `None` is returned.
    pub fn create(
        &self,
        role_type: RoleTypeId,
        host_role: Option<&Arc<dyn HostRole>>,
        player: &Arc<Player>,
    ) -> Option<Arc<Role>> {
        let key = RoleKey::active(player.key());

        let Some(role) = self.build(role_type, host_role, player) else {
            self.roles.remove(&key);
            return None;
        };

        let role = Arc::new(role);
        self.roles.replace(key, role.clone());
        debug!("🎭 {} is now {}", player, role_type);
        Some(role)
    }

    fn build(
        &self,
        role_type: RoleTypeId,
        host_role: Option<&Arc<dyn HostRole>>,
        player: &Arc<Player>,
    ) -> Option<Role> {
        let family = RoleFamily::of(role_type);

        if family == RoleFamily::None {
            return Some(Role::new(role_type, player.clone(), host_role.map(HostRef::new), RoleKind::None));
        }

        let Some(host_role) = host_role else {
            warn!("⚠️ No host role object for {} ({}), no surrogate created", player, role_type);
            return None;
        };

        let host = HostRef::new(host_role);
        let fpc = || FpcRole::new(host.clone(), self.pool.clone());

        let kind = match family {
            RoleFamily::None => RoleKind::None,
            RoleFamily::Spectator => RoleKind::Spectator,
            RoleFamily::Human => RoleKind::Human(fpc()),
            RoleFamily::Scp049 => RoleKind::Scp049(Scp049Role::new(fpc(), host.clone())),
            RoleFamily::Scp3114 => RoleKind::Scp3114(Scp3114Role::new(fpc(), host.clone())),
            RoleFamily::Scp939 => RoleKind::Scp939(Scp939Role::new(fpc(), host.clone())),
            RoleFamily::Generic => RoleKind::Generic(GenericRole::new(role_type.is_fpc_role().then(fpc))),
        };

        Some(Role::new(role_type, player.clone(), Some(host), kind))
    }

    /// The active role surrogate for `player`, if any.
    pub fn current(&self, player: &Player) -> Option<Arc<Role>> {
        self.roles.lookup(&RoleKey::active(player.key()))
    }

    pub fn lookup(&self, key: &RoleKey) -> Option<Arc<Role>> {
        self.roles.lookup(key)
    }

    /// Evicts every role slot held by `player`.
    pub fn remove(&self, player: &Player) -> Option<Arc<Role>> {
        self.roles.remove(&RoleKey::active(player.key()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn clear(&self) {
        self.roles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostPlayer;
    use crate::mock::{MockPlayer, MockRole};

    fn setup() -> (RoleFactory, Arc<SetPool<HostKey>>, Arc<dyn HostPlayer>, Arc<Player>) {
        let pool = Arc::new(SetPool::new(8));
        let host: Arc<dyn HostPlayer> = MockPlayer::new(1, "Iceberg");
        let player = Arc::new(Player::new(&host));
        (RoleFactory::new(pool.clone()), pool, host, player)
    }

    #[test]
    fn test_role_change_produces_new_instance() {
        let (factory, _pool, _host, player) = setup();
        let class_d: Arc<dyn HostRole> = MockRole::new(RoleTypeId::ClassD);
        let scientist: Arc<dyn HostRole> = MockRole::new(RoleTypeId::Scientist);

        let before = factory.create(RoleTypeId::ClassD, Some(&class_d), &player).unwrap();
        let after = factory.create(RoleTypeId::Scientist, Some(&scientist), &player).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        let current = factory.current(&player).unwrap();
        assert!(Arc::ptr_eq(&current, &after));
        assert_eq!(current.role_type(), RoleTypeId::Scientist);
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn test_same_role_type_still_replaces() {
        let (factory, _pool, _host, player) = setup();
        let first: Arc<dyn HostRole> = MockRole::new(RoleTypeId::ClassD);
        let second: Arc<dyn HostRole> = MockRole::new(RoleTypeId::ClassD);

        let a = factory.create(RoleTypeId::ClassD, Some(&first), &player).unwrap();
        let b = factory.create(RoleTypeId::ClassD, Some(&second), &player).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_role_falls_back_to_generic() {
        let (factory, _pool, _host, player) = setup();
        let host_role: Arc<dyn HostRole> = MockRole::new(RoleTypeId::Unknown(77));

        let role = factory.create(RoleTypeId::Unknown(77), Some(&host_role), &player).unwrap();
        assert!(role.is_generic());
        assert!(role.fpc().is_none());
    }

    #[test]
    fn test_dispatch_by_family() {
        let (factory, _pool, _host, player) = setup();
        let cases = [
            (RoleTypeId::Spectator, "spectator"),
            (RoleTypeId::NtfCaptain, "human"),
            (RoleTypeId::Scp049, "scp049"),
            (RoleTypeId::Scp3114, "scp3114"),
            (RoleTypeId::Scp939, "scp939"),
            (RoleTypeId::Scp173, "generic"),
        ];

        for (role_type, expected) in cases {
            let host_role: Arc<dyn HostRole> = MockRole::new(role_type);
            let role = factory.create(role_type, Some(&host_role), &player).unwrap();
            let family = match role.kind() {
                RoleKind::None => "none",
                RoleKind::Spectator => "spectator",
                RoleKind::Human(_) => "human",
                RoleKind::Scp049(_) => "scp049",
                RoleKind::Scp3114(_) => "scp3114",
                RoleKind::Scp939(_) => "scp939",
                RoleKind::Generic(_) => "generic",
            };
            assert_eq!(family, expected, "{role_type:?}");
        }
    }

    #[test]
    fn test_none_role_needs_no_host_object() {
        let (factory, _pool, _host, player) = setup();
        let role = factory.create(RoleTypeId::None, None, &player).unwrap();
        assert!(matches!(role.kind(), RoleKind::None));
    }

    #[test]
    fn test_missing_host_role_evicts_previous() {
        let (factory, _pool, _host, player) = setup();
        let host_role: Arc<dyn HostRole> = MockRole::new(RoleTypeId::ClassD);
        factory.create(RoleTypeId::ClassD, Some(&host_role), &player).unwrap();

        assert!(factory.create(RoleTypeId::Scientist, None, &player).is_none());
        assert!(factory.current(&player).is_none());
    }

    #[test]
    fn test_replaced_role_returns_pooled_set() {
        let (factory, pool, _host, player) = setup();
        let viewer_host: Arc<dyn HostPlayer> = MockPlayer::new(2, "Clef");
        let viewer = Player::new(&viewer_host);

        let human: Arc<dyn HostRole> = MockRole::new(RoleTypeId::ClassD);
        let old = factory.create(RoleTypeId::ClassD, Some(&human), &player).unwrap();
        let fpc = old.fpc().unwrap();
        assert!(fpc.hide_from(&viewer));
        assert!(fpc.is_invisible_to(&viewer));
        assert_eq!(pool.available(), 0);

        let spectator: Arc<dyn HostRole> = MockRole::new(RoleTypeId::Spectator);
        factory.create(RoleTypeId::Spectator, Some(&spectator), &player).unwrap();

        assert_eq!(pool.available(), 1);
        assert!(!old.fpc().unwrap().is_invisible_to(&viewer));
        assert!(!old.fpc().unwrap().hide_from(&viewer));
    }
}
