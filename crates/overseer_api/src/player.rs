//! Player surrogate.

use std::fmt;
use std::sync::Arc;

use crate::error::SurrogateError;
use crate::host::{HostKey, HostPlayer, HostRef};
use crate::registry::Surrogate;
use crate::types::Vec3;
use crate::validation::validate_field;

/// Managed stand-in for one connected player.
///
/// The id and nickname are captured at construction so a stale surrogate
/// can still be named in logs; everything else reads through to the host.
pub struct Player {
    host: HostRef<dyn HostPlayer>,
    id: u32,
    nickname: String,
}

impl Player {
    pub fn new(host: &Arc<dyn HostPlayer>) -> Self {
        Self {
            host: HostRef::new(host),
            id: host.player_id(),
            nickname: host.nickname(),
        }
    }

    pub fn key(&self) -> HostKey {
        self.host.key()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Live host object, while it exists.
    pub fn host(&self) -> Option<Arc<dyn HostPlayer>> {
        self.host.get()
    }

    /// Whether the host still has this player.
    pub fn is_connected(&self) -> bool {
        self.host.is_alive()
    }

    /// Current nickname, or the one seen at construction once disconnected.
    pub fn nickname(&self) -> String {
        self.host.read(|p| p.nickname()).unwrap_or_else(|| self.nickname.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.host.read(|p| p.user_id())
    }

    pub fn is_verified(&self) -> bool {
        self.host.read(|p| p.is_verified()).unwrap_or(false)
    }

    pub fn health(&self) -> Option<f64> {
        self.host.read(|p| p.health())
    }

    pub fn set_health(&self, value: f64) -> Result<(), SurrogateError> {
        validate_field("player.health", value)?;
        self.host.write("player", |p| p.set_health(value))
    }

    pub fn max_health(&self) -> Option<f64> {
        self.host.read(|p| p.max_health())
    }

    pub fn is_alive(&self) -> bool {
        self.health().map_or(false, |hp| hp > 0.0)
    }

    pub fn position(&self) -> Option<Vec3> {
        self.host.read(|p| p.position())
    }

    pub fn set_position(&self, value: Vec3) -> Result<(), SurrogateError> {
        self.host.write("player", |p| p.set_position(value))
    }
}

impl Surrogate for Player {}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nickname())
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlayer;

    #[test]
    fn test_reads_follow_the_host() {
        let mock = MockPlayer::new(7, "Dr. Bright");
        let host: Arc<dyn HostPlayer> = mock.clone();
        let player = Player::new(&host);

        mock.set_health(40.0);
        assert_eq!(player.health(), Some(40.0));
        assert!(player.is_alive());

        player.set_health(10.0).unwrap();
        assert_eq!(mock.health(), 10.0);
        assert!(player.set_health(-5.0).is_err());
        assert_eq!(player.to_string(), "Dr. Bright");
    }

    #[test]
    fn test_stale_player_keeps_its_name() {
        let host: Arc<dyn HostPlayer> = MockPlayer::new(3, "Kondraki");
        let player = Player::new(&host);
        drop(host);

        assert!(!player.is_connected());
        assert_eq!(player.health(), None);
        assert_eq!(player.nickname(), "Kondraki");
        assert_eq!(player.set_health(50.0), Err(SurrogateError::HostGone("player")));
    }
}
