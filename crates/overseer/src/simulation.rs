//! # Simulated Host Session
//!
//! Stands in for the game server: a fixed cast of in-process players joins,
//! cycles through roles, fights over doors and grenades and finally leaves.
//! Every step goes through the [`Interceptor`], so plugins see the same
//! event traffic a live host would produce.
//!
//! The script is deterministic: which player acts on a tick is derived from
//! the tick number alone.

use std::sync::Arc;
use std::time::Duration;

use overseer_api::mock::{MockDoor, MockPickup, MockPlayer, MockRagdoll, MockRole};
use overseer_api::{
    DanceType, DoorDamageType, HostDoor, HostPickup, HostPlayer, HostRagdoll, ItemType, Role, RoleTypeId,
    SpawnReason, SurrogateError,
};
use overseer_event_system::ShutdownState;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{SimulationSettings, TuningSettings};
use crate::interception::{DoorOutcome, Interceptor};

const ROTATION: [RoleTypeId; 8] = [
    RoleTypeId::ClassD,
    RoleTypeId::Scp049,
    RoleTypeId::Scientist,
    RoleTypeId::Scp3114,
    RoleTypeId::FacilityGuard,
    RoleTypeId::Scp939,
    RoleTypeId::NtfPrivate,
    RoleTypeId::ChaosRifleman,
];

const DOORS: [(&str, f64); 3] = [("LCZ_ARMORY", 60.0), ("HCZ_049_GATE", 35.0), ("GATE_A", 120.0)];

const CALL_DURATION: f64 = 20.0;
const DOOR_HIT: f64 = 25.0;
const GRENADE_HIT: f64 = 45.0;
const SHOT: f64 = 30.0;

/// What the session did, logged at shutdown.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub ticks: u64,
    pub joined: u64,
    pub left: u64,
    pub role_changes: u64,
    pub denied_role_changes: u64,
    pub shots: u64,
    pub door_hits: u64,
    pub doors_destroyed: u64,
    pub grenades: u64,
    pub deaths: u64,
    pub revives: u64,
    pub calls: u64,
    pub dances: u64,
    pub footsteps_heard: u64,
}

pub struct HostSession {
    interceptor: Interceptor,
    settings: SimulationSettings,
    tuning: TuningSettings,
    players: Vec<Arc<MockPlayer>>,
    doors: Vec<Arc<MockDoor>>,
    ragdolls: Vec<Arc<MockRagdoll>>,
    next_serial: u16,
    summary: SessionSummary,
}

impl HostSession {
    pub fn new(interceptor: Interceptor, settings: SimulationSettings, tuning: TuningSettings) -> Self {
        Self {
            interceptor,
            settings,
            tuning,
            players: Vec::new(),
            doors: Vec::new(),
            ragdolls: Vec::new(),
            next_serial: 1,
            summary: SessionSummary::default(),
        }
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Runs the configured number of ticks, or until shutdown is initiated,
    /// then disconnects everyone still connected.
    pub async fn run(&mut self, shutdown: &ShutdownState) -> SessionSummary {
        let mut interval = tokio::time::interval(Duration::from_millis(self.settings.tick_interval_ms));
        info!(
            "🎮 Simulating {} ticks every {}ms with {} players",
            self.settings.ticks, self.settings.tick_interval_ms, self.settings.players
        );

        for tick in 0..self.settings.ticks {
            interval.tick().await;
            if shutdown.is_shutdown_initiated() {
                info!("🛑 Stopping simulation at tick {}", tick);
                break;
            }
            self.step(tick);
        }

        self.disconnect_all();
        self.summary.clone()
    }

    /// Plays one tick of the script.
    pub fn step(&mut self, tick: u64) {
        self.summary.ticks += 1;

        if tick == 0 {
            self.start_round();
        }
        if self.players.is_empty() {
            return;
        }

        self.rotate_role(tick);
        match tick % 4 {
            0 => self.shoot(tick),
            1 => self.hit_door(tick),
            2 => self.throw_grenade(tick),
            _ => self.scp_abilities(tick),
        }
        self.bury_the_dead();
    }

    fn start_round(&mut self) {
        self.interceptor.map_generated(self.settings.seed);

        for (name, health) in DOORS {
            let door = MockDoor::new(name, health);
            let host: Arc<dyn HostDoor> = door.clone();
            self.interceptor.surrogates().door(Some(&host));
            self.doors.push(door);
        }

        for id in 0..self.settings.players {
            let mock = MockPlayer::new(id + 2, &format!("Subject-{:03}", id + 1));
            mock.assign_role(MockRole::new(RoleTypeId::Spectator));
            mock.verify();
            let host: Arc<dyn HostPlayer> = mock.clone();
            if self.interceptor.player_verified(&host).is_some() {
                self.summary.joined += 1;
            }
            self.players.push(mock);
        }
    }

    fn host(&self, index: usize) -> Arc<dyn HostPlayer> {
        self.players[index % self.players.len()].clone()
    }

    fn rotate_role(&mut self, tick: u64) {
        let index = tick as usize % self.players.len();
        let wanted = ROTATION[(tick as usize / self.players.len() + index) % ROTATION.len()];
        self.change_role(index, wanted, SpawnReason::Respawn);
    }

    fn change_role(&mut self, index: usize, wanted: RoleTypeId, reason: SpawnReason) -> Option<Arc<Role>> {
        let mock = self.players[index % self.players.len()].clone();
        let host: Arc<dyn HostPlayer> = mock.clone();
        let old_role = host.role().map_or(RoleTypeId::None, |role| role.role_type());

        let Some(spawn) = self.interceptor.changing_role(&host, wanted, reason) else {
            self.summary.denied_role_changes += 1;
            return None;
        };

        mock.assign_role(MockRole::new(spawn));
        mock.set_health(mock.max_health());
        let role = self.interceptor.role_changed(&host, old_role)?;
        self.summary.role_changes += 1;
        self.apply_tuning(&role);
        Some(role)
    }

    fn apply_tuning(&self, role: &Role) {
        if let Some(fpc) = role.fpc() {
            report(role, fpc.set_stamina_usage_multiplier(self.tuning.stamina_usage_multiplier));
            report(role, fpc.set_stamina_regen_multiplier(self.tuning.stamina_regen_multiplier));
        }
        if let Some(scp049) = role.as_scp049() {
            report(role, scp049.set_sense_distance(self.tuning.scp049_sense_distance));
            report(role, scp049.set_call_cooldown(self.tuning.scp049_call_cooldown));
        }
    }

    fn shoot(&mut self, tick: u64) {
        let attacker = self.host(tick as usize);
        let target = self.host(tick as usize + 1);
        if target.role().map_or(true, |role| role.role_type().is_dead()) {
            return;
        }
        if self.interceptor.hurting(&target, Some(&attacker), SHOT).is_some() {
            self.summary.shots += 1;
        }
    }

    fn hit_door(&mut self, tick: u64) {
        if self.doors.is_empty() {
            return;
        }
        let door: Arc<dyn HostDoor> = self.doors[tick as usize % self.doors.len()].clone();
        if door.is_destroyed() {
            return;
        }

        match self.interceptor.damage_door(&door, DOOR_HIT, DoorDamageType::Weapon) {
            DoorOutcome::Damaged { remaining } => {
                self.summary.door_hits += 1;
                debug!("🚪 {} down to {:.0} health", door.name(), remaining);
            }
            DoorOutcome::Destroyed => {
                self.summary.door_hits += 1;
                self.summary.doors_destroyed += 1;
                info!("💥 {} was destroyed", door.name());
            }
            outcome => debug!("🚪 {} hit had no effect: {:?}", door.name(), outcome),
        }
    }

    fn throw_grenade(&mut self, tick: u64) {
        let thrower = self.host(tick as usize);
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);

        let grenade: Arc<dyn HostPickup> = MockPickup::grenade(serial, ItemType::GrenadeHe, 3.0);
        let Some(pickup) = self.interceptor.pickup_added(&grenade) else {
            return;
        };
        if let Some(live) = pickup.as_grenade() {
            report(&pickup, live.set_fuse_time(self.tuning.grenade_fuse_time));
        }

        let nearby: Vec<Arc<dyn HostPlayer>> = self
            .players
            .iter()
            .filter(|player| player.player_id() != thrower.player_id())
            .map(|player| -> Arc<dyn HostPlayer> { player.clone() })
            .collect();

        let targets = self.interceptor.exploding_grenade(Some(&thrower), &grenade, &nearby);
        self.summary.grenades += 1;
        for target in targets {
            if let Some(host) = target.host().filter(|host| host.role().is_some_and(|role| !role.role_type().is_dead())) {
                self.interceptor.hurting(&host, Some(&thrower), GRENADE_HIT);
            }
        }
        // Duds are swept up by the host.
        self.interceptor.pickup_destroyed(&grenade);
    }

    fn scp_abilities(&mut self, tick: u64) {
        let surrogates = self.interceptor.surrogates().clone();

        for index in 0..self.players.len() {
            let host = self.host(index);
            let Some(role) = surrogates
                .lookup_player(&host)
                .and_then(|player| surrogates.role_of(&player))
            else {
                continue;
            };

            if role.as_scp049().is_some() && self.interceptor.sending_call(&host, CALL_DURATION).is_some() {
                self.summary.calls += 1;
            }

            if role.as_scp3114().is_some() {
                let start = !role.as_scp3114().is_some_and(|scp| scp.is_dancing());
                let dance = DanceType((tick % 7) as u8);
                if self.interceptor.dancing(&host, start, dance).is_some() {
                    self.summary.dances += 1;
                }
            }

            if role.as_scp939().is_some() {
                let walker = self.host(index + 1);
                if self.interceptor.playing_footstep(&walker, &host) {
                    self.summary.footsteps_heard += 1;
                }
            }
        }
    }

    fn bury_the_dead(&mut self) {
        for index in 0..self.players.len() {
            let mock = self.players[index].clone();
            let host: Arc<dyn HostPlayer> = mock.clone();
            let Some(role_type) = host.role().map(|role| role.role_type()) else {
                continue;
            };
            if host.health() > 0.0 || role_type.is_dead() {
                continue;
            }

            self.summary.deaths += 1;
            let ragdoll = if role_type == RoleTypeId::Scp3114 {
                MockRagdoll::scp3114(&host.nickname(), RoleTypeId::ClassD)
            } else {
                MockRagdoll::owned_by(&host.nickname(), host.player_id(), role_type)
            };
            let ragdoll_host: Arc<dyn HostRagdoll> = ragdoll.clone();
            let corpse = self.interceptor.ragdoll_spawned(&ragdoll_host);
            if let Some(disguise) = corpse.as_ref().and_then(|corpse| corpse.as_scp3114()) {
                let owner = host.nickname();
                report(&owner, disguise.set_reveal_delay(self.tuning.scp3114_reveal_delay));
                report(&owner, disguise.set_reveal_duration(self.tuning.scp3114_reveal_duration));
            }
            self.ragdolls.push(ragdoll);
            mock.set_health(mock.max_health());

            let revived = corpse.as_ref().is_some_and(|corpse| self.try_revive(index, corpse));
            if revived {
                self.summary.revives += 1;
                self.change_role(index, RoleTypeId::Scp0492, SpawnReason::Revived);
                self.interceptor.ragdoll_removed(&ragdoll_host);
            } else {
                self.change_role(index, RoleTypeId::Spectator, SpawnReason::Died);
            }
        }
    }

    /// Any SCP-049 other than the dead player revives the corpse.
    fn try_revive(&self, dead: usize, corpse: &overseer_api::Ragdoll) -> bool {
        let surrogates = self.interceptor.surrogates();
        self.players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != dead)
            .filter_map(|(_, mock)| {
                let host: Arc<dyn HostPlayer> = mock.clone();
                surrogates.lookup_player(&host)
            })
            .filter_map(|player| surrogates.role_of(&player))
            .any(|role| role.as_scp049().is_some_and(|doctor| doctor.resurrect(corpse)))
    }

    /// Disconnects every player and clears leftover ragdolls.
    pub fn disconnect_all(&mut self) {
        for mock in self.players.drain(..) {
            let host: Arc<dyn HostPlayer> = mock;
            if self.interceptor.player_left(&host) {
                self.summary.left += 1;
            }
        }
        for ragdoll in self.ragdolls.drain(..) {
            let host: Arc<dyn HostRagdoll> = ragdoll;
            self.interceptor.ragdoll_removed(&host);
        }
    }
}

fn report<D: std::fmt::Display + ?Sized>(subject: &D, result: Result<(), SurrogateError>) {
    if let Err(e) = result {
        warn!("⚠️ Could not tune {}: {}", subject, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overseer_api::Surrogates;
    use overseer_event_system::{ChangingRoleEvent, Deniable, Events, VerifiedEvent};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn session(players: u32, ticks: u64) -> HostSession {
        let interceptor = Interceptor::new(Arc::new(Events::default()), Arc::new(Surrogates::new()));
        let settings = SimulationSettings {
            tick_interval_ms: 1,
            ticks,
            players,
            seed: 7,
        };
        HostSession::new(interceptor, settings, TuningSettings::default())
    }

    #[tokio::test]
    async fn test_full_session_releases_every_surrogate() {
        let mut session = session(4, 24);
        let verified = Arc::new(AtomicU64::new(0));
        let seen = verified.clone();
        session.interceptor.events().player.verified.on("count", move |_: &mut VerifiedEvent| {
            seen.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });

        let summary = session.run(&ShutdownState::new()).await;

        assert_eq!(summary.ticks, 24);
        assert_eq!(summary.joined, 4);
        assert_eq!(summary.left, 4);
        assert_eq!(verified.load(Ordering::Relaxed), 4);
        assert!(summary.role_changes >= 24);
        assert!(summary.grenades > 0);

        let counts = session.interceptor.surrogates().counts();
        assert_eq!(counts.players, 0);
        assert_eq!(counts.roles, 0);
        assert_eq!(counts.ragdolls, 0);
        assert_eq!(counts.pickups, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_first_tick() {
        let mut session = session(3, 10);
        let shutdown = ShutdownState::new();
        shutdown.initiate_shutdown();

        let summary = session.run(&shutdown).await;
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.joined, 0);
    }

    #[test]
    fn test_denied_role_changes_are_counted() {
        let mut session = session(2, 4);
        session
            .interceptor
            .events()
            .player
            .changing_role
            .on("freeze", |event: &mut ChangingRoleEvent| {
                event.deny();
                Ok(())
            });

        session.step(0);
        session.step(1);

        assert_eq!(session.summary().role_changes, 0);
        assert_eq!(session.summary().denied_role_changes, 2);
        session.disconnect_all();
        assert_eq!(session.summary().left, 2);
    }

    #[test]
    fn test_doors_wear_down() {
        let mut session = session(2, 0);
        session.step(0);
        for tick in (1..40).step_by(4) {
            session.step(tick);
        }
        assert!(session.summary().door_hits > 0);
        assert!(session.summary().doors_destroyed > 0);
        session.disconnect_all();
    }
}
