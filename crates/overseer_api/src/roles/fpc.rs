//! First-person movement capability shared by humanoid and SCP roles.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SurrogateError;
use crate::host::{HostFpcModule, HostKey, HostRef, HostRole};
use crate::player::Player;
use crate::pool::SetPool;
use crate::types::{MovementState, Vec3};
use crate::validation::validate_field;

/// Movement state of a role driven by the host's first-person module.
///
/// Speeds, velocity and movement state are read through to the host on
/// every access. Stamina multipliers and the set of players this role is
/// hidden from exist only on the surrogate.
#[derive(Debug)]
pub struct FpcRole {
    host: HostRef<dyn HostRole>,
    stamina: Mutex<StaminaMultipliers>,
    invisible_for: Mutex<Option<HashSet<HostKey>>>,
    pool: Arc<SetPool<HostKey>>,
}

#[derive(Debug, Clone, Copy)]
struct StaminaMultipliers {
    usage: f64,
    regen: f64,
}

impl FpcRole {
    pub(crate) fn new(host: HostRef<dyn HostRole>, pool: Arc<SetPool<HostKey>>) -> Self {
        Self {
            host,
            stamina: Mutex::new(StaminaMultipliers { usage: 1.0, regen: 1.0 }),
            invisible_for: Mutex::new(Some(pool.acquire())),
            pool,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&dyn HostFpcModule) -> R) -> Option<R> {
        let role = self.host.get()?;
        role.fpc().map(f)
    }

    fn write<R>(&self, f: impl FnOnce(&dyn HostFpcModule) -> R) -> Result<R, SurrogateError> {
        let role = self.host.get().ok_or(SurrogateError::HostGone("role"))?;
        let module = role.fpc().ok_or(SurrogateError::CapabilityMissing("first-person movement"))?;
        Ok(f(module))
    }

    fn write_speed(
        &self,
        field: &'static str,
        value: f64,
        apply: impl FnOnce(&dyn HostFpcModule, f64),
    ) -> Result<(), SurrogateError> {
        validate_field(field, value)?;
        self.write(|module| apply(module, value))
    }

    pub fn walking_speed(&self) -> Option<f64> {
        self.read(|m| m.walking_speed())
    }

    pub fn set_walking_speed(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_speed("fpc.walking_speed", value, |m, v| m.set_walking_speed(v))
    }

    pub fn sprinting_speed(&self) -> Option<f64> {
        self.read(|m| m.sprinting_speed())
    }

    pub fn set_sprinting_speed(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_speed("fpc.sprinting_speed", value, |m, v| m.set_sprinting_speed(v))
    }

    pub fn crouching_speed(&self) -> Option<f64> {
        self.read(|m| m.crouching_speed())
    }

    pub fn set_crouching_speed(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_speed("fpc.crouching_speed", value, |m, v| m.set_crouching_speed(v))
    }

    pub fn jumping_speed(&self) -> Option<f64> {
        self.read(|m| m.jumping_speed())
    }

    pub fn set_jumping_speed(&self, value: f64) -> Result<(), SurrogateError> {
        self.write_speed("fpc.jumping_speed", value, |m, v| m.set_jumping_speed(v))
    }

    pub fn velocity(&self) -> Option<Vec3> {
        self.read(|m| m.velocity())
    }

    pub fn is_grounded(&self) -> bool {
        self.read(|m| m.is_grounded()).unwrap_or(false)
    }

    pub fn movement_state(&self) -> Option<MovementState> {
        self.read(|m| m.movement_state())
    }

    pub fn set_movement_state(&self, value: MovementState) -> Result<(), SurrogateError> {
        self.write(|m| m.set_movement_state(value))
    }

    /// Speed for the movement state the host currently reports.
    pub fn movement_speed(&self) -> Option<f64> {
        self.read(|m| match m.movement_state() {
            MovementState::Crouching | MovementState::Sneaking => m.crouching_speed(),
            MovementState::Walking => m.walking_speed(),
            MovementState::Sprinting => m.sprinting_speed(),
        })
    }

    fn stamina(&self) -> MutexGuard<'_, StaminaMultipliers> {
        self.stamina.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stamina_usage_multiplier(&self) -> f64 {
        self.stamina().usage
    }

    pub fn set_stamina_usage_multiplier(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("fpc.stamina_usage_multiplier", value)?;
        self.stamina().usage = value;
        Ok(())
    }

    pub fn stamina_regen_multiplier(&self) -> f64 {
        self.stamina().regen
    }

    pub fn set_stamina_regen_multiplier(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("fpc.stamina_regen_multiplier", value)?;
        self.stamina().regen = value;
        Ok(())
    }

    fn with_invisible<R>(&self, f: impl FnOnce(&mut HashSet<HostKey>) -> R) -> Option<R> {
        let mut guard = self.invisible_for.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().map(f)
    }

    /// Hides this role from `viewer`. Returns false if already hidden or torn down.
    pub fn hide_from(&self, viewer: &Player) -> bool {
        self.with_invisible(|set| set.insert(viewer.key())).unwrap_or(false)
    }

    pub fn reveal_to(&self, viewer: &Player) -> bool {
        self.with_invisible(|set| set.remove(&viewer.key())).unwrap_or(false)
    }

    pub fn is_invisible_to(&self, viewer: &Player) -> bool {
        self.with_invisible(|set| set.contains(&viewer.key())).unwrap_or(false)
    }

    pub fn invisible_count(&self) -> usize {
        self.with_invisible(|set| set.len()).unwrap_or(0)
    }

    /// Hands the pooled set back. Later visibility calls are no-ops.
    pub(crate) fn release(&self) {
        let taken = self.invisible_for.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(set) = taken {
            self.pool.release(set);
        }
    }
}
