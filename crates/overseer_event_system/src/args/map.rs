//! Map event payloads: doors, grenades, pickups and generation.

use std::sync::Arc;

use overseer_api::{Door, DoorDamageType, ItemType, Pickup, Player, Vec3};

use crate::{impl_deniable, impl_event};

/// A door is about to take damage. Handlers may change `damage`.
#[derive(Debug)]
pub struct DamagingDoorEvent {
    pub door: Arc<Door>,
    pub damage: f64,
    pub damage_type: DoorDamageType,
    pub is_allowed: bool,
}

impl DamagingDoorEvent {
    pub fn new(door: Arc<Door>, damage: f64, damage_type: DoorDamageType) -> Self {
        Self {
            door,
            damage,
            damage_type,
            is_allowed: true,
        }
    }
}

/// A door's health ran out and it is about to break.
#[derive(Debug)]
pub struct DestroyingDoorEvent {
    pub door: Arc<Door>,
    pub is_allowed: bool,
}

impl DestroyingDoorEvent {
    pub fn new(door: Arc<Door>) -> Self {
        Self { door, is_allowed: true }
    }

    /// Remaining health read from the host, zero if the door is gone.
    pub fn health(&self) -> f64 {
        self.door.health().unwrap_or(0.0)
    }
}

#[derive(Debug)]
pub struct DestroyedDoorEvent {
    pub door: Arc<Door>,
}

impl DestroyedDoorEvent {
    pub fn new(door: Arc<Door>) -> Self {
        Self { door }
    }
}

/// A grenade is about to explode. Only players left in `targets` are affected.
#[derive(Debug)]
pub struct ExplodingGrenadeEvent {
    pub thrower: Option<Arc<Player>>,
    pub grenade_type: ItemType,
    pub position: Vec3,
    pub targets: Vec<Arc<Player>>,
    pub is_allowed: bool,
}

impl ExplodingGrenadeEvent {
    pub fn new(thrower: Option<Arc<Player>>, grenade_type: ItemType, position: Vec3, targets: Vec<Arc<Player>>) -> Self {
        Self {
            thrower,
            grenade_type,
            position,
            targets,
            is_allowed: true,
        }
    }
}

#[derive(Debug)]
pub struct PickupAddedEvent {
    pub pickup: Arc<Pickup>,
}

impl PickupAddedEvent {
    pub fn new(pickup: Arc<Pickup>) -> Self {
        Self { pickup }
    }
}

/// A pickup is being removed from the world. Its surrogate is evicted
/// after dispatch.
#[derive(Debug)]
pub struct PickupDestroyedEvent {
    pub pickup: Arc<Pickup>,
}

impl PickupDestroyedEvent {
    pub fn new(pickup: Arc<Pickup>) -> Self {
        Self { pickup }
    }
}

/// The facility layout finished generating.
#[derive(Debug)]
pub struct GeneratedEvent {
    pub seed: i32,
}

impl GeneratedEvent {
    pub fn new(seed: i32) -> Self {
        Self { seed }
    }
}

impl_event! {
    DamagingDoorEvent => "map:door_damaging",
    DestroyingDoorEvent => "map:door_destroying",
    DestroyedDoorEvent => "map:door_destroyed",
    ExplodingGrenadeEvent => "map:exploding_grenade",
    PickupAddedEvent => "map:pickup_added",
    PickupDestroyedEvent => "map:pickup_destroyed",
    GeneratedEvent => "map:generated",
}

impl_deniable!(DamagingDoorEvent, DestroyingDoorEvent, ExplodingGrenadeEvent);
