use crate::error::SurrogateError;
use crate::host::{HostRef, HostRole, HostScp3114Abilities};
use crate::types::{DanceType, DisguiseStatus};

use super::fpc::FpcRole;

/// SCP-3114 surrogate. Dance and disguise state live on the host.
#[derive(Debug)]
pub struct Scp3114Role {
    fpc: FpcRole,
    host: HostRef<dyn HostRole>,
}

impl Scp3114Role {
    pub(crate) fn new(fpc: FpcRole, host: HostRef<dyn HostRole>) -> Self {
        Self { fpc, host }
    }

    pub fn fpc(&self) -> &FpcRole {
        &self.fpc
    }

    fn read<R>(&self, f: impl FnOnce(&dyn HostScp3114Abilities) -> R) -> Option<R> {
        let role = self.host.get()?;
        role.scp3114().map(f)
    }

    pub fn dance_type(&self) -> DanceType {
        self.read(|a| a.dance_type()).unwrap_or(DanceType::NONE)
    }

    pub fn set_dance_type(&self, value: DanceType) -> Result<(), SurrogateError> {
        let role = self.host.get().ok_or(SurrogateError::HostGone("role"))?;
        let abilities = role
            .scp3114()
            .ok_or(SurrogateError::CapabilityMissing("SCP-3114 dance"))?;
        abilities.set_dance_type(value);
        Ok(())
    }

    pub fn is_dancing(&self) -> bool {
        self.read(|a| a.is_dancing()).unwrap_or(false)
    }

    pub fn disguise_status(&self) -> DisguiseStatus {
        self.read(|a| a.disguise_status()).unwrap_or_default()
    }
}
