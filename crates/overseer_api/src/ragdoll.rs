//! Ragdoll surrogates.

use std::sync::Arc;

use crate::error::SurrogateError;
use crate::host::{HostKey, HostRagdoll, HostRef, HostScp3114Ragdoll};
use crate::registry::Surrogate;
use crate::roles::RoleTypeId;
use crate::types::Vec3;
use crate::validation::validate_field;

#[derive(Debug)]
pub enum RagdollKind {
    Basic,
    Scp3114(Scp3114Ragdoll),
}

/// Managed stand-in for a corpse.
#[derive(Debug)]
pub struct Ragdoll {
    host: HostRef<dyn HostRagdoll>,
    kind: RagdollKind,
}

impl Ragdoll {
    pub fn new(host: &Arc<dyn HostRagdoll>) -> Self {
        let handle = HostRef::new(host);
        let kind = if host.scp3114().is_some() {
            RagdollKind::Scp3114(Scp3114Ragdoll { host: handle.clone() })
        } else {
            RagdollKind::Basic
        };
        Self { host: handle, kind }
    }

    pub fn key(&self) -> HostKey {
        self.host.key()
    }

    pub fn host(&self) -> Option<Arc<dyn HostRagdoll>> {
        self.host.get()
    }

    pub fn kind(&self) -> &RagdollKind {
        &self.kind
    }

    pub fn as_scp3114(&self) -> Option<&Scp3114Ragdoll> {
        match &self.kind {
            RagdollKind::Scp3114(ragdoll) => Some(ragdoll),
            RagdollKind::Basic => None,
        }
    }

    pub fn owner_nickname(&self) -> Option<String> {
        self.host.read(|r| r.owner_nickname())
    }

    pub fn owner_id(&self) -> Option<u32> {
        self.host.read(|r| r.owner_id()).flatten()
    }

    pub fn role_type(&self) -> Option<RoleTypeId> {
        self.host.read(|r| r.role_type())
    }

    pub fn position(&self) -> Option<Vec3> {
        self.host.read(|r| r.position())
    }
}

impl Surrogate for Ragdoll {}

/// A ragdoll SCP-3114 can wear as a disguise. Every property reads and
/// writes through to the host.
#[derive(Debug)]
pub struct Scp3114Ragdoll {
    host: HostRef<dyn HostRagdoll>,
}

impl Scp3114Ragdoll {
    fn read<R>(&self, f: impl FnOnce(&dyn HostScp3114Ragdoll) -> R) -> Option<R> {
        let ragdoll = self.host.get()?;
        ragdoll.scp3114().map(f)
    }

    fn write(&self, f: impl FnOnce(&dyn HostScp3114Ragdoll)) -> Result<(), SurrogateError> {
        let ragdoll = self.host.get().ok_or(SurrogateError::HostGone("ragdoll"))?;
        let disguise = ragdoll
            .scp3114()
            .ok_or(SurrogateError::CapabilityMissing("SCP-3114 disguise"))?;
        f(disguise);
        Ok(())
    }

    fn write_timing(
        &self,
        field: &'static str,
        value: f64,
        apply: impl FnOnce(&dyn HostScp3114Ragdoll, f64),
    ) -> Result<(), SurrogateError> {
        validate_field(field, value)?;
        self.write(|r| apply(r, value))
    }

    pub fn disguise_role(&self) -> Option<RoleTypeId> {
        self.read(|r| r.disguise_role())
    }

    pub fn set_disguise_role(&self, value: RoleTypeId) -> Result<(), SurrogateError> {
        self.write(|r| r.set_disguise_role(value))
    }

    pub fn reveal_delay(&self) -> Option<f64> {
        self.read(|r| r.reveal_delay())
    }

    pub fn set_reveal_delay(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_timing("scp3114_ragdoll.reveal_delay", value, |r, v| r.set_reveal_delay(v))
    }

    pub fn reveal_duration(&self) -> Option<f64> {
        self.read(|r| r.reveal_duration())
    }

    pub fn set_reveal_duration(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_timing("scp3114_ragdoll.reveal_duration", value, |r, v| r.set_reveal_duration(v))
    }

    pub fn reveal_elapsed(&self) -> Option<f64> {
        self.read(|r| r.reveal_elapsed())
    }

    pub fn set_reveal_elapsed(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_timing("scp3114_ragdoll.reveal_elapsed", value, |r, v| r.set_reveal_elapsed(v))
    }

    pub fn is_playing_animation(&self) -> bool {
        self.read(|r| r.is_playing_animation()).unwrap_or(false)
    }

    pub fn set_playing_animation(&self, value: bool) -> Result<(), SurrogateError> {
        self.write(|r| r.set_playing_animation(value))
    }
}
