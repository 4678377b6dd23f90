//! # Overseer API
//!
//! Surrogate object model for extensions running inside a game server.
//!
//! The host simulation owns every player, role, pickup, ragdoll and door.
//! Extensions never touch those objects directly: they hold surrogates,
//! stable managed handles that read through to the live host object and
//! degrade to `None` once the host destroys it.
//!
//! ## Core pieces
//!
//! * [`host`] - traits the host implements, plus [`HostKey`] identity
//! * [`registry::WrapperRegistry`] - exactly one surrogate per host identity
//! * [`roles`] - role type enumeration, role variants and the [`RoleFactory`]
//! * [`Surrogates`] - the process-scoped hub owning every registry
//! * [`validation`] - declarative value rules for settable properties
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use overseer_api::{HostPlayer, Surrogates};
//!
//! let surrogates = Surrogates::new();
//! let player = surrogates.player(Some(&host_player)).unwrap();
//! let role = surrogates.role_of(&player);
//! ```

pub mod door;
pub mod error;
pub mod host;
pub mod pickups;
pub mod player;
pub mod pool;
pub mod ragdoll;
pub mod registry;
pub mod roles;
pub mod surrogates;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "mock-host"))]
pub mod mock;

pub use door::Door;
pub use error::SurrogateError;
pub use host::{
    HostAbility, HostDoor, HostFpcModule, HostGrenade, HostKey, HostPickup, HostPlayer, HostProjectile, HostRagdoll,
    HostRef, HostRole, HostScp049Abilities, HostScp3114Abilities, HostScp3114Ragdoll, HostScp939Abilities,
};
pub use pickups::{GrenadePickup, Pickup, PickupKind};
pub use player::Player;
pub use pool::SetPool;
pub use ragdoll::{Ragdoll, RagdollKind, Scp3114Ragdoll};
pub use registry::{RegistryError, Surrogate, WrapperRegistry};
pub use roles::{
    FpcRole, GenericRole, LeadingTeam, Role, RoleFactory, RoleKind, RoleTypeId, Scp049Role, Scp3114Role, Scp939Role,
    Side, Team,
};
pub use surrogates::{SurrogateCounts, Surrogates};
pub use types::{DanceType, DisguiseStatus, DoorDamageType, ItemType, MovementState, SpawnReason, Vec3};
pub use validation::{validate_field, FieldRule, Rule, ValidationError, PROPERTY_RULES};
