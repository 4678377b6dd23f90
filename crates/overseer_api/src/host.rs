//! # Host Boundary
//!
//! Traits describing the host-owned objects the surrogate layer mirrors. The
//! host simulation implements them; this crate only ever holds `Weak`
//! references to them, so it never extends a host object's lifetime beyond
//! the allocation itself.
//!
//! Setters take `&self`: host objects are shared and mutated by the host's
//! own tick, so implementations use interior mutability.
//!
//! ## Identity
//!
//! [`HostKey`] is derived from the address of the host object's allocation.
//! Every surrogate keeps a [`HostRef`], whose `Weak` pins that allocation, so
//! an address cannot be handed to a new host object while a surrogate for the
//! old one still exists.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::SurrogateError;
use crate::roles::RoleTypeId;
use crate::types::{DanceType, DisguiseStatus, ItemType, MovementState, Vec3};

/// Stable identity of one host object, derived from its allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey(usize);

impl HostKey {
    /// Computes the identity of a shared host object.
    pub fn of<T: ?Sized>(host: &Arc<T>) -> Self {
        HostKey(Arc::as_ptr(host).cast::<()>() as usize)
    }

    pub fn raw(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostKey({:#x})", self.0)
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Non-owning handle to a host object, carrying its identity.
pub struct HostRef<T: ?Sized> {
    key: HostKey,
    host: Weak<T>,
}

impl<T: ?Sized> HostRef<T> {
    pub fn new(host: &Arc<T>) -> Self {
        Self {
            key: HostKey::of(host),
            host: Arc::downgrade(host),
        }
    }

    pub fn key(&self) -> HostKey {
        self.key
    }

    /// Upgrades to the live host object, if the host still has it.
    pub fn get(&self) -> Option<Arc<T>> {
        self.host.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.host.strong_count() > 0
    }

    /// Reads from the live host object. `None` once the host object is gone.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.get().map(|host| f(&*host))
    }

    /// Writes to the live host object, naming `what` in the error if it is gone.
    pub fn write<R>(&self, what: &'static str, f: impl FnOnce(&T) -> R) -> Result<R, SurrogateError> {
        self.get()
            .map(|host| f(&*host))
            .ok_or(SurrogateError::HostGone(what))
    }
}

impl<T: ?Sized> Clone for HostRef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            host: self.host.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for HostRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRef")
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A connected player as the host sees it.
pub trait HostPlayer: Send + Sync {
    fn player_id(&self) -> u32;
    fn user_id(&self) -> String;
    fn nickname(&self) -> String;
    fn is_verified(&self) -> bool;
    fn health(&self) -> f64;
    fn set_health(&self, value: f64);
    fn max_health(&self) -> f64;
    fn position(&self) -> Vec3;
    fn set_position(&self, value: Vec3);
    /// The player's current role object, if one is assigned.
    fn role(&self) -> Option<Arc<dyn HostRole>>;
}

/// The host's per-player role object. Replaced, never mutated, on role change.
///
/// Capability accessors return `None` when the role has no such module.
pub trait HostRole: Send + Sync {
    fn role_type(&self) -> RoleTypeId;
    /// Seconds since the role was assigned.
    fn active_time(&self) -> f64;

    fn fpc(&self) -> Option<&dyn HostFpcModule> {
        None
    }

    fn scp049(&self) -> Option<&dyn HostScp049Abilities> {
        None
    }

    fn scp3114(&self) -> Option<&dyn HostScp3114Abilities> {
        None
    }

    fn scp939(&self) -> Option<&dyn HostScp939Abilities> {
        None
    }
}

/// First-person movement module shared by every humanoid role.
pub trait HostFpcModule: Send + Sync {
    fn walking_speed(&self) -> f64;
    fn set_walking_speed(&self, value: f64);
    fn sprinting_speed(&self) -> f64;
    fn set_sprinting_speed(&self, value: f64);
    fn crouching_speed(&self) -> f64;
    fn set_crouching_speed(&self, value: f64);
    fn jumping_speed(&self) -> f64;
    fn set_jumping_speed(&self, value: f64);
    fn velocity(&self) -> Vec3;
    fn is_grounded(&self) -> bool;
    fn movement_state(&self) -> MovementState;
    fn set_movement_state(&self, value: MovementState);
}

/// One cooldown-driven SCP ability.
pub trait HostAbility: Send + Sync {
    /// Remaining cooldown in seconds.
    fn cooldown(&self) -> f64;
    fn set_cooldown(&self, value: f64);
    /// Remaining active duration in seconds.
    fn duration(&self) -> f64;
    fn set_duration(&self, value: f64);
    /// Full duration the ability runs for when triggered.
    fn base_duration(&self) -> f64;
    /// Pushes the current timers to clients.
    fn sync(&self);

    fn is_active(&self) -> bool {
        self.duration() > 0.0
    }
}

pub trait HostScp049Abilities: Send + Sync {
    fn resurrect_ability(&self) -> Option<&dyn HostAbility>;
    fn call_ability(&self) -> Option<&dyn HostAbility>;
    fn sense_ability(&self) -> Option<&dyn HostAbility>;
    fn attack_ability(&self) -> Option<&dyn HostAbility>;
    fn sense_distance(&self) -> f64;
    fn set_sense_distance(&self, value: f64);
    fn is_recalling(&self) -> bool;
    /// Player id of the current sense target.
    fn sense_target(&self) -> Option<u32>;
    fn lose_sense_target(&self);
    /// Revives the owner of `ragdoll`. Returns false if the host refuses.
    fn revive(&self, ragdoll: &dyn HostRagdoll) -> bool;
}

pub trait HostScp3114Abilities: Send + Sync {
    fn dance_type(&self) -> DanceType;
    fn set_dance_type(&self, value: DanceType);
    fn is_dancing(&self) -> bool;
    fn disguise_status(&self) -> DisguiseStatus;
}

pub trait HostScp939Abilities: Send + Sync {
    fn is_focused(&self) -> bool;
    fn sound_range(&self) -> f64;
    fn set_sound_range(&self, value: f64);
}

/// An item lying in the world.
pub trait HostPickup: Send + Sync {
    fn serial(&self) -> u16;
    fn item_type(&self) -> ItemType;
    fn position(&self) -> Vec3;
    fn weight(&self) -> f64;
    fn is_locked(&self) -> bool;

    /// Timed-grenade behaviour, present only on throwable pickups.
    fn grenade(&self) -> Option<&dyn HostGrenade> {
        None
    }
}

pub trait HostGrenade: Send + Sync {
    /// Fuse time the projectile template was configured with.
    fn fuse_time(&self) -> f64;
    fn explode(&self);
}

/// A live thrown projectile.
pub trait HostProjectile: Send + Sync {
    fn fuse_time(&self) -> f64;
    fn set_fuse_time(&self, value: f64);
}

/// A corpse left behind by a player.
pub trait HostRagdoll: Send + Sync {
    fn owner_nickname(&self) -> String;
    /// Player id of the owner, if they are still connected.
    fn owner_id(&self) -> Option<u32>;
    fn role_type(&self) -> RoleTypeId;
    fn position(&self) -> Vec3;

    fn scp3114(&self) -> Option<&dyn HostScp3114Ragdoll> {
        None
    }
}

/// Ragdoll SCP-3114 uses as a disguise.
pub trait HostScp3114Ragdoll: Send + Sync {
    fn disguise_role(&self) -> RoleTypeId;
    fn set_disguise_role(&self, value: RoleTypeId);
    fn reveal_delay(&self) -> f64;
    fn set_reveal_delay(&self, value: f64);
    fn reveal_duration(&self) -> f64;
    fn set_reveal_duration(&self, value: f64);
    fn reveal_elapsed(&self) -> f64;
    fn set_reveal_elapsed(&self, value: f64);
    fn is_playing_animation(&self) -> bool;
    fn set_playing_animation(&self, value: bool);
}

pub trait HostDoor: Send + Sync {
    fn name(&self) -> String;
    fn health(&self) -> f64;
    fn set_health(&self, value: f64);
    fn max_health(&self) -> f64;
    fn is_open(&self) -> bool;
    fn is_destroyed(&self) -> bool;
    fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Thing(&'static str);

    impl Named for Thing {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_host_key_matches_for_clones_of_same_allocation() {
        let a: Arc<dyn Named> = Arc::new(Thing("a"));
        let b: Arc<dyn Named> = Arc::new(Thing("b"));

        assert_eq!(HostKey::of(&a), HostKey::of(&a.clone()));
        assert_ne!(HostKey::of(&a), HostKey::of(&b));
    }

    #[test]
    fn test_host_ref_goes_stale_when_host_drops() {
        let host: Arc<dyn Named> = Arc::new(Thing("door"));
        let handle = HostRef::new(&host);

        assert_eq!(handle.read(|h| h.name().to_string()).as_deref(), Some("door"));
        assert!(handle.write("thing", |_| ()).is_ok());

        drop(host);
        assert!(!handle.is_alive());
        assert_eq!(handle.read(|h| h.name().len()), None);
        assert_eq!(handle.write("thing", |_| ()), Err(SurrogateError::HostGone("thing")));
    }
}
