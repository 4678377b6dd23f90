use std::fmt;
use std::sync::Arc;

use crate::host::{HostKey, HostRef, HostRole};
use crate::player::Player;
use crate::registry::Surrogate;

use super::fpc::FpcRole;
use super::scp049::Scp049Role;
use super::scp3114::Scp3114Role;
use super::scp939::Scp939Role;
use super::types::{RoleTypeId, Side, Team};

/// Role without bespoke behaviour. Movement is exposed when the role type
/// is first-person controlled.
#[derive(Debug)]
pub struct GenericRole {
    fpc: Option<FpcRole>,
}

impl GenericRole {
    pub(crate) fn new(fpc: Option<FpcRole>) -> Self {
        Self { fpc }
    }

    pub fn fpc(&self) -> Option<&FpcRole> {
        self.fpc.as_ref()
    }
}

/// Capability data carried by each role family.
#[derive(Debug)]
pub enum RoleKind {
    None,
    Spectator,
    Human(FpcRole),
    Scp049(Scp049Role),
    Scp3114(Scp3114Role),
    Scp939(Scp939Role),
    Generic(GenericRole),
}

/// Surrogate for the role a player currently holds.
///
/// A role change on the host replaces the host role object, so a `Role` is
/// never updated in place: the factory builds a new one and evicts this one.
pub struct Role {
    role_type: RoleTypeId,
    owner: Arc<Player>,
    host: Option<HostRef<dyn HostRole>>,
    kind: RoleKind,
}

impl Role {
    pub(crate) fn new(
        role_type: RoleTypeId,
        owner: Arc<Player>,
        host: Option<HostRef<dyn HostRole>>,
        kind: RoleKind,
    ) -> Self {
        Self { role_type, owner, host, kind }
    }

    pub fn role_type(&self) -> RoleTypeId {
        self.role_type
    }

    pub fn owner(&self) -> &Arc<Player> {
        &self.owner
    }

    pub fn kind(&self) -> &RoleKind {
        &self.kind
    }

    pub fn team(&self) -> Team {
        self.role_type.team()
    }

    pub fn side(&self) -> Side {
        self.role_type.side()
    }

    /// Identity of the host role object, if one backs this surrogate.
    pub fn host_key(&self) -> Option<HostKey> {
        self.host.as_ref().map(HostRef::key)
    }

    /// False once the host role object has been destroyed.
    pub fn is_valid(&self) -> bool {
        self.host.as_ref().map_or(true, HostRef::is_alive)
    }

    /// Seconds since the role was assigned, read from the host.
    pub fn active_time(&self) -> Option<f64> {
        self.host.as_ref()?.read(|role| role.active_time())
    }

    pub fn fpc(&self) -> Option<&FpcRole> {
        match &self.kind {
            RoleKind::Human(fpc) => Some(fpc),
            RoleKind::Scp049(role) => Some(role.fpc()),
            RoleKind::Scp3114(role) => Some(role.fpc()),
            RoleKind::Scp939(role) => Some(role.fpc()),
            RoleKind::Generic(role) => role.fpc(),
            RoleKind::None | RoleKind::Spectator => None,
        }
    }

    pub fn as_scp049(&self) -> Option<&Scp049Role> {
        match &self.kind {
            RoleKind::Scp049(role) => Some(role),
            _ => None,
        }
    }

    pub fn as_scp3114(&self) -> Option<&Scp3114Role> {
        match &self.kind {
            RoleKind::Scp3114(role) => Some(role),
            _ => None,
        }
    }

    pub fn as_scp939(&self) -> Option<&Scp939Role> {
        match &self.kind {
            RoleKind::Scp939(role) => Some(role),
            _ => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.kind, RoleKind::Generic(_))
    }
}

impl Surrogate for Role {
    fn teardown(&self) {
        if let Some(fpc) = self.fpc() {
            fpc.release();
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.role_type, self.owner)
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("role_type", &self.role_type)
            .field("owner", &self.owner.id())
            .field("valid", &self.is_valid())
            .field("kind", &self.kind)
            .finish()
    }
}
