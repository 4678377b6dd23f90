use crate::error::SurrogateError;
use crate::host::{HostRef, HostRole, HostScp939Abilities};
use crate::validation::validate_field;

use super::fpc::FpcRole;

/// SCP-939 surrogate.
#[derive(Debug)]
pub struct Scp939Role {
    fpc: FpcRole,
    host: HostRef<dyn HostRole>,
}

impl Scp939Role {
    pub(crate) fn new(fpc: FpcRole, host: HostRef<dyn HostRole>) -> Self {
        Self { fpc, host }
    }

    pub fn fpc(&self) -> &FpcRole {
        &self.fpc
    }

    fn read<R>(&self, f: impl FnOnce(&dyn HostScp939Abilities) -> R) -> Option<R> {
        let role = self.host.get()?;
        role.scp939().map(f)
    }

    pub fn is_focused(&self) -> bool {
        self.read(|a| a.is_focused()).unwrap_or(false)
    }

    /// Range at which footsteps and other noises are revealed.
    pub fn sound_range(&self) -> Option<f64> {
        self.read(|a| a.sound_range())
    }

    pub fn set_sound_range(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("scp939.sound_range", value)?;
        let role = self.host.get().ok_or(SurrogateError::HostGone("role"))?;
        let abilities = role
            .scp939()
            .ok_or(SurrogateError::CapabilityMissing("SCP-939 abilities"))?;
        abilities.set_sound_range(value);
        Ok(())
    }
}
