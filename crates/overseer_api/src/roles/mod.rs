//! # Role Surrogates
//!
//! Roles are a closed family of variants ([`RoleKind`]) keyed by
//! [`RoleTypeId`]. Movement shared by humanoid and SCP roles lives in one
//! embedded capability, [`FpcRole`]; SCP variants add their ability modules
//! on top of it.

pub mod factory;
pub mod fpc;
pub mod role;
pub mod scp049;
pub mod scp3114;
pub mod scp939;
pub mod types;

pub use factory::{RoleFactory, RoleFamily, RoleKey, ACTIVE_ROLE_SLOT};
pub use fpc::FpcRole;
pub use role::{GenericRole, Role, RoleKind};
pub use scp049::{Scp049Ability, Scp049Role};
pub use scp3114::Scp3114Role;
pub use scp939::Scp939Role;
pub use types::{LeadingTeam, RoleTypeId, Side, Team};
