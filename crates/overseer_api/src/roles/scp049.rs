use tracing::error;

use crate::error::SurrogateError;
use crate::host::{HostAbility, HostRef, HostRole, HostScp049Abilities};
use crate::ragdoll::Ragdoll;
use crate::validation::validate_field;

use super::fpc::FpcRole;

/// Ability modules SCP-049 is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scp049Ability {
    Resurrect,
    Call,
    Sense,
    Attack,
}

impl Scp049Ability {
    pub const ALL: [Scp049Ability; 4] = [
        Scp049Ability::Resurrect,
        Scp049Ability::Call,
        Scp049Ability::Sense,
        Scp049Ability::Attack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scp049Ability::Resurrect => "resurrect",
            Scp049Ability::Call => "call",
            Scp049Ability::Sense => "sense",
            Scp049Ability::Attack => "attack",
        }
    }

    fn select<'a>(&self, abilities: &'a dyn HostScp049Abilities) -> Option<&'a dyn HostAbility> {
        match self {
            Scp049Ability::Resurrect => abilities.resurrect_ability(),
            Scp049Ability::Call => abilities.call_ability(),
            Scp049Ability::Sense => abilities.sense_ability(),
            Scp049Ability::Attack => abilities.attack_ability(),
        }
    }
}

/// SCP-049 surrogate.
///
/// Abilities the host role lacks are reported once at construction; their
/// timers then read as `None` and writes fail with `CapabilityMissing`.
#[derive(Debug)]
pub struct Scp049Role {
    fpc: FpcRole,
    host: HostRef<dyn HostRole>,
    missing: Vec<Scp049Ability>,
}

impl Scp049Role {
    pub(crate) fn new(fpc: FpcRole, host: HostRef<dyn HostRole>) -> Self {
        let missing: Vec<Scp049Ability> = host
            .read(|role| match role.scp049() {
                Some(abilities) => Scp049Ability::ALL
                    .into_iter()
                    .filter(|ability| ability.select(abilities).is_none())
                    .collect(),
                None => Scp049Ability::ALL.to_vec(),
            })
            .unwrap_or_default();

        for ability in &missing {
            error!("❌ SCP-049 role is missing its {} ability", ability.name());
        }

        Self { fpc, host, missing }
    }

    pub fn fpc(&self) -> &FpcRole {
        &self.fpc
    }

    /// Abilities found missing at construction.
    pub fn missing_abilities(&self) -> &[Scp049Ability] {
        &self.missing
    }

    fn with_abilities<R>(&self, f: impl FnOnce(&dyn HostScp049Abilities) -> R) -> Option<R> {
        let role = self.host.get()?;
        role.scp049().map(f)
    }

    fn read_ability<R>(&self, which: Scp049Ability, f: impl FnOnce(&dyn HostAbility) -> R) -> Option<R> {
        self.with_abilities(|abilities| which.select(abilities).map(f)).flatten()
    }

    fn write_ability(
        &self,
        which: Scp049Ability,
        field: &'static str,
        value: f64,
        apply: impl FnOnce(&dyn HostAbility, f64),
    ) -> Result<(), SurrogateError> {
        validate_field(field, value)?;
        let role = self.host.get().ok_or(SurrogateError::HostGone("role"))?;
        let abilities = role.scp049().ok_or(SurrogateError::CapabilityMissing("SCP-049 abilities"))?;
        let ability = which
            .select(abilities)
            .ok_or(SurrogateError::CapabilityMissing(which.name()))?;
        apply(ability, value);
        ability.sync();
        Ok(())
    }

    pub fn call_cooldown(&self) -> Option<f64> {
        self.read_ability(Scp049Ability::Call, |a| a.cooldown())
    }

    pub fn set_call_cooldown(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_ability(Scp049Ability::Call, "scp049.cooldown", value, |a, v| a.set_cooldown(v))
    }

    pub fn sense_cooldown(&self) -> Option<f64> {
        self.read_ability(Scp049Ability::Sense, |a| a.cooldown())
    }

    pub fn set_sense_cooldown(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_ability(Scp049Ability::Sense, "scp049.cooldown", value, |a, v| a.set_cooldown(v))
    }

    pub fn attack_cooldown(&self) -> Option<f64> {
        self.read_ability(Scp049Ability::Attack, |a| a.cooldown())
    }

    pub fn set_attack_cooldown(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_ability(Scp049Ability::Attack, "scp049.cooldown", value, |a, v| a.set_cooldown(v))
    }

    pub fn call_duration(&self) -> Option<f64> {
        self.read_ability(Scp049Ability::Call, |a| a.duration())
    }

    pub fn set_call_duration(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_ability(Scp049Ability::Call, "scp049.duration", value, |a, v| a.set_duration(v))
    }

    pub fn sense_duration(&self) -> Option<f64> {
        self.read_ability(Scp049Ability::Sense, |a| a.duration())
    }

    pub fn set_sense_duration(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_ability(Scp049Ability::Sense, "scp049.duration", value, |a, v| a.set_duration(v))
    }

    pub fn sense_distance(&self) -> Option<f64> {
        self.with_abilities(|a| a.sense_distance())
    }

    pub fn set_sense_distance(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("scp049.sense_distance", value)?;
        let role = self.host.get().ok_or(SurrogateError::HostGone("role"))?;
        let abilities = role.scp049().ok_or(SurrogateError::CapabilityMissing("SCP-049 abilities"))?;
        abilities.set_sense_distance(value);
        Ok(())
    }

    pub fn is_recalling(&self) -> bool {
        self.with_abilities(|a| a.is_recalling()).unwrap_or(false)
    }

    pub fn is_call_active(&self) -> bool {
        self.read_ability(Scp049Ability::Call, |a| a.is_active()).unwrap_or(false)
    }

    pub fn sense_target(&self) -> Option<u32> {
        self.with_abilities(|a| a.sense_target()).flatten()
    }

    pub fn lose_sense_target(&self) {
        self.with_abilities(|a| a.lose_sense_target());
    }

    /// Restarts the call ability's active window at its full length.
    pub fn refresh_call_duration(&self) -> Result<(), SurrogateError> {
        let full = self
            .read_ability(Scp049Ability::Call, |a| a.base_duration())
            .ok_or(SurrogateError::CapabilityMissing("call"))?;
        self.set_call_duration(full)
    }

    /// Revives the owner of `ragdoll`. False if either host object is gone
    /// or the host refuses.
    pub fn resurrect(&self, ragdoll: &Ragdoll) -> bool {
        let Some(corpse) = ragdoll.host() else {
            return false;
        };
        self.with_abilities(|a| a.revive(&*corpse)).unwrap_or(false)
    }
}
