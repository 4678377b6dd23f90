//! Door surrogate.

use std::fmt;
use std::sync::Arc;

use crate::error::SurrogateError;
use crate::host::{HostDoor, HostKey, HostRef};
use crate::registry::Surrogate;
use crate::validation::validate_field;

pub struct Door {
    host: HostRef<dyn HostDoor>,
    name: String,
}

impl Door {
    pub fn new(host: &Arc<dyn HostDoor>) -> Self {
        Self {
            host: HostRef::new(host),
            name: host.name(),
        }
    }

    pub fn key(&self) -> HostKey {
        self.host.key()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remaining health. `None` once the host door is gone.
    pub fn health(&self) -> Option<f64> {
        self.host.read(|d| d.health())
    }

    pub fn max_health(&self) -> Option<f64> {
        self.host.read(|d| d.max_health())
    }

    pub fn is_open(&self) -> bool {
        self.host.read(|d| d.is_open()).unwrap_or(false)
    }

    pub fn is_destroyed(&self) -> bool {
        self.host.read(|d| d.is_destroyed()).unwrap_or(true)
    }

    /// Subtracts `amount` from the door's health, clamping at zero.
    /// Returns the remaining health.
    pub fn damage(&self, amount: f64) -> Result<f64, SurrogateError> {
        validate_field("door.damage", amount)?;
        self.host.write("door", |d| {
            let remaining = (d.health() - amount).max(0.0);
            d.set_health(remaining);
            remaining
        })
    }

    pub fn destroy(&self) -> Result<(), SurrogateError> {
        self.host.write("door", |d| d.destroy())
    }
}

impl Surrogate for Door {}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Door")
            .field("name", &self.name)
            .field("health", &self.health())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDoor;

    #[test]
    fn test_damage_clamps_at_zero() {
        let host: Arc<dyn HostDoor> = MockDoor::new("GATE_A", 30.0);
        let door = Door::new(&host);

        assert_eq!(door.damage(10.0), Ok(20.0));
        assert_eq!(door.damage(50.0), Ok(0.0));
        assert!(door.damage(-1.0).is_err());
        assert_eq!(door.health(), Some(0.0));
    }

    #[test]
    fn test_destroy_and_stale_reads() {
        let host: Arc<dyn HostDoor> = MockDoor::new("LCZ_ARMORY", 10.0);
        let door = Door::new(&host);
        door.destroy().unwrap();
        assert!(door.is_destroyed());

        drop(host);
        assert_eq!(door.health(), None);
        assert_eq!(door.destroy(), Err(SurrogateError::HostGone("door")));
    }
}
