//! Pickup surrogates.
//!
//! Throwable pickups are wrapped as [`GrenadePickup`]; everything else is a
//! plain item pickup.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SurrogateError;
use crate::host::{HostKey, HostPickup, HostProjectile, HostRef};
use crate::registry::Surrogate;
use crate::types::{ItemType, Vec3};
use crate::validation::validate_field;

/// Variant data for a pickup.
#[derive(Debug)]
pub enum PickupKind {
    Item,
    Grenade(GrenadePickup),
}

/// Managed stand-in for an item lying in the world.
#[derive(Debug)]
pub struct Pickup {
    host: HostRef<dyn HostPickup>,
    serial: u16,
    item_type: ItemType,
    kind: PickupKind,
}

impl Pickup {
    /// Wraps `host`, choosing the grenade variant when the host exposes one.
    pub fn new(host: &Arc<dyn HostPickup>) -> Self {
        let handle = HostRef::new(host);
        let kind = match host.grenade() {
            Some(grenade) => PickupKind::Grenade(GrenadePickup::new(handle.clone(), grenade.fuse_time())),
            None => PickupKind::Item,
        };

        Self {
            host: handle,
            serial: host.serial(),
            item_type: host.item_type(),
            kind,
        }
    }

    pub fn key(&self) -> HostKey {
        self.host.key()
    }

    pub fn serial(&self) -> u16 {
        self.serial
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn kind(&self) -> &PickupKind {
        &self.kind
    }

    pub fn as_grenade(&self) -> Option<&GrenadePickup> {
        match &self.kind {
            PickupKind::Grenade(grenade) => Some(grenade),
            PickupKind::Item => None,
        }
    }

    pub fn exists(&self) -> bool {
        self.host.is_alive()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.host.read(|p| p.position())
    }

    pub fn weight(&self) -> Option<f64> {
        self.host.read(|p| p.weight())
    }

    pub fn is_locked(&self) -> bool {
        self.host.read(|p| p.is_locked()).unwrap_or(false)
    }
}

impl Surrogate for Pickup {}

impl fmt::Display for Pickup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} #{}", self.item_type, self.serial)
    }
}

/// A timed grenade lying in the world.
///
/// The fuse time is copied from the host at construction and then owned by
/// the surrogate; it reaches the host only through
/// [`GrenadePickup::write_projectile_info`] when the grenade is thrown.
#[derive(Debug)]
pub struct GrenadePickup {
    host: HostRef<dyn HostPickup>,
    fuse_time: Mutex<f64>,
}

impl GrenadePickup {
    fn new(host: HostRef<dyn HostPickup>, fuse_time: f64) -> Self {
        Self {
            host,
            fuse_time: Mutex::new(fuse_time),
        }
    }

    pub fn fuse_time(&self) -> f64 {
        *self.fuse_time.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_fuse_time(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("grenade.fuse_time", value)?;
        *self.fuse_time.lock().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(())
    }

    /// Detonates the grenade where it lies.
    pub fn explode(&self) -> Result<(), SurrogateError> {
        let pickup = self.host.get().ok_or(SurrogateError::HostGone("pickup"))?;
        let grenade = pickup.grenade().ok_or(SurrogateError::CapabilityMissing("timed grenade"))?;
        grenade.explode();
        Ok(())
    }

    /// Copies this pickup's fuse time onto a projectile spawned from it.
    pub fn write_projectile_info(&self, projectile: &dyn HostProjectile) {
        projectile.set_fuse_time(self.fuse_time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPickup, MockProjectile};

    #[test]
    fn test_grenade_variant_copies_fuse_time() {
        let mock = MockPickup::grenade(11, ItemType::GrenadeHe, 5.0);
        let host: Arc<dyn HostPickup> = mock.clone();
        let pickup = Pickup::new(&host);

        let grenade = pickup.as_grenade().unwrap();
        assert_eq!(grenade.fuse_time(), 5.0);

        grenade.set_fuse_time(2.5).unwrap();
        assert!(grenade.set_fuse_time(-1.0).is_err());
        assert_eq!(grenade.fuse_time(), 2.5);

        let projectile = MockProjectile::new(5.0);
        grenade.write_projectile_info(&*projectile);
        assert_eq!(projectile.fuse_time(), 2.5);

        grenade.explode().unwrap();
        assert!(mock.exploded());
    }

    #[test]
    fn test_plain_item_has_no_grenade() {
        let host: Arc<dyn HostPickup> = MockPickup::item(3, ItemType::Medkit);
        let pickup = Pickup::new(&host);
        assert!(pickup.as_grenade().is_none());
        assert_eq!(pickup.to_string(), "Medkit #3");
    }

    #[test]
    fn test_explode_after_destruction_fails() {
        let host: Arc<dyn HostPickup> = MockPickup::grenade(4, ItemType::GrenadeFlash, 3.0);
        let pickup = Pickup::new(&host);
        drop(host);

        assert!(!pickup.exists());
        assert_eq!(
            pickup.as_grenade().unwrap().explode(),
            Err(SurrogateError::HostGone("pickup"))
        );
    }
}
