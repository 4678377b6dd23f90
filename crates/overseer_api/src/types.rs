//! # Core Type Definitions
//!
//! Small value types shared by the host boundary and the surrogate model.
//! Everything here is plain data: no host references, no registry state.

use serde::{Deserialize, Serialize};

/// Represents a 3D position or velocity in the host world.
///
/// # Examples
///
/// ```rust
/// use overseer_api::Vec3;
///
/// let position = Vec3::new(12.0, 1.5, -40.0);
/// let distance = position.distance(Vec3::zero());
/// assert!(distance > 40.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate (vertical axis)
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vec3 {
    /// Creates a new Vec3 with the specified coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculates the Euclidean distance to another Vec3.
    pub fn distance(&self, other: Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Length of the vector.
    pub fn magnitude(&self) -> f64 {
        self.distance(Self::zero())
    }

    /// Creates a zero vector (0, 0, 0).
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Movement state of a first-person controlled role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    Crouching,
    Sneaking,
    Walking,
    Sprinting,
}

impl Default for MovementState {
    fn default() -> Self {
        MovementState::Walking
    }
}

/// Item kinds a pickup can carry.
///
/// Only the kinds the surrogate layer treats specially are named; anything
/// else the host reports is kept as its raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    KeycardJanitor,
    Radio,
    Medkit,
    Adrenaline,
    Painkillers,
    Coin,
    GrenadeHe,
    GrenadeFlash,
    Scp018,
    Other(i16),
}

impl ItemType {
    /// Whether the item is a thrown projectile with a fuse.
    pub fn is_throwable(&self) -> bool {
        matches!(self, ItemType::GrenadeHe | ItemType::GrenadeFlash | ItemType::Scp018)
    }
}

/// Dance animation selected by SCP-3114.
///
/// The host stores the variant as a byte; `DanceType::NONE` (255) means the
/// role is not dancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DanceType(pub u8);

impl DanceType {
    /// Sentinel used by the host when no dance is playing.
    pub const NONE: DanceType = DanceType(u8::MAX);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for DanceType {
    fn default() -> Self {
        Self::NONE
    }
}

/// Why a player's role is being changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnReason {
    None,
    RoundStart,
    LateJoin,
    Respawn,
    Died,
    Escaped,
    Revived,
    RemoteAdmin,
    Destroyed,
}

/// Damage source reported when a door is being damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorDamageType {
    None,
    ServerCommand,
    Grenade,
    Weapon,
    Scp096,
}

/// Disguise progress of SCP-3114.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisguiseStatus {
    None,
    Equipping,
    Active,
}

impl Default for DisguiseStatus {
    fn default() -> Self {
        DisguiseStatus::None
    }
}
