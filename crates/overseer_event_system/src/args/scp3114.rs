use std::sync::Arc;

use overseer_api::{DanceType, Player, Role, Scp3114Role, SurrogateError};
use tracing::debug;

use crate::{impl_deniable, impl_event};

/// SCP-3114 is starting or stopping a dance.
///
/// The dance type is not stored on the payload: reads and writes go through
/// the role surrogate to the host, so a handler's choice is what plays.
#[derive(Debug)]
pub struct DancingEvent {
    pub player: Arc<Player>,
    pub role: Arc<Role>,
    pub is_dancing: bool,
    pub is_allowed: bool,
}

impl DancingEvent {
    /// Builds the payload and writes the initial dance type to the host:
    /// `dance` when starting, `DanceType::NONE` when stopping.
    pub fn new(player: Arc<Player>, role: Arc<Role>, is_dancing: bool, dance: DanceType) -> Self {
        let event = Self {
            player,
            role,
            is_dancing,
            is_allowed: true,
        };
        let initial = if is_dancing { dance } else { DanceType::NONE };
        if let Err(e) = event.set_dance_type(initial) {
            debug!("No initial dance written for {}: {}", event.player, e);
        }
        event
    }

    pub fn scp3114(&self) -> Option<&Scp3114Role> {
        self.role.as_scp3114()
    }

    pub fn dance_type(&self) -> DanceType {
        self.scp3114().map_or(DanceType::NONE, Scp3114Role::dance_type)
    }

    pub fn set_dance_type(&self, value: DanceType) -> Result<(), SurrogateError> {
        self.scp3114()
            .ok_or(SurrogateError::CapabilityMissing("SCP-3114 dance"))?
            .set_dance_type(value)
    }
}

impl_event!(DancingEvent => "scp3114:dancing");
impl_deniable!(DancingEvent);

#[cfg(test)]
mod tests {
    use super::*;
    use overseer_api::host::{HostPlayer, HostRole};
    use overseer_api::mock::{MockPlayer, MockRole};
    use overseer_api::{RoleTypeId, Surrogates};

    fn wrap(hub: &Surrogates, id: u32, role: Arc<MockRole>) -> (Arc<Player>, Arc<Role>) {
        let mock = MockPlayer::new(id, "Skeleton");
        mock.assign_role(role);
        let host: Arc<dyn HostPlayer> = mock;
        let player = hub.player(Some(&host)).unwrap();
        let role = hub.role_of(&player).unwrap();
        (player, role)
    }

    #[test]
    fn test_initial_dance_is_written_to_host() {
        let hub = Surrogates::new();
        let mock_role = MockRole::new(RoleTypeId::Scp3114);
        let (player, role) = wrap(&hub, 1, mock_role.clone());

        let event = DancingEvent::new(player.clone(), role.clone(), true, DanceType(3));
        assert_eq!(event.dance_type(), DanceType(3));
        assert_eq!(mock_role.scp3114().unwrap().dance_type(), DanceType(3));

        let event = DancingEvent::new(player, role, false, DanceType(3));
        assert!(event.dance_type().is_none());
    }

    #[test]
    fn test_role_without_dance_module() {
        let hub = Surrogates::new();
        let (player, role) = wrap(&hub, 2, MockRole::new(RoleTypeId::ClassD));

        let event = DancingEvent::new(player, role, true, DanceType(1));
        assert!(event.is_allowed);
        assert!(event.dance_type().is_none());
        assert!(matches!(
            event.set_dance_type(DanceType(1)),
            Err(SurrogateError::CapabilityMissing(_))
        ));
    }
}
