//! In-process host objects.
//!
//! Stand-ins for the host simulation's entities, shared by unit tests across
//! the workspace and by the simulated host session in the binary. Values
//! live behind mutexes so the host side can change them between ticks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::host::{
    HostAbility, HostDoor, HostFpcModule, HostGrenade, HostPickup, HostPlayer, HostProjectile, HostRagdoll,
    HostRole, HostScp049Abilities, HostScp3114Abilities, HostScp3114Ragdoll, HostScp939Abilities,
};
use crate::roles::RoleTypeId;
use crate::types::{DanceType, DisguiseStatus, ItemType, MovementState, Vec3};

#[derive(Debug, Default)]
struct Slot<T>(Mutex<T>);

impl<T: Clone> Slot<T> {
    fn new(value: T) -> Self {
        Slot(Mutex::new(value))
    }

    fn get(&self) -> T {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, value: T) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

pub struct MockPlayer {
    id: u32,
    nickname: String,
    verified: AtomicBool,
    health: Slot<f64>,
    position: Slot<Vec3>,
    role: Slot<Option<Arc<MockRole>>>,
}

impl MockPlayer {
    pub fn new(id: u32, nickname: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            nickname: nickname.to_string(),
            verified: AtomicBool::new(false),
            health: Slot::new(100.0),
            position: Slot::new(Vec3::zero()),
            role: Slot::new(None),
        })
    }

    pub fn verify(&self) {
        self.verified.store(true, Ordering::SeqCst);
    }

    /// Replaces the role object, as the host does on every role change.
    pub fn assign_role(&self, role: Arc<MockRole>) {
        self.role.set(Some(role));
    }

    pub fn clear_role(&self) {
        self.role.set(None);
    }

    pub fn mock_role(&self) -> Option<Arc<MockRole>> {
        self.role.get()
    }
}

impl HostPlayer for MockPlayer {
    fn player_id(&self) -> u32 {
        self.id
    }

    fn user_id(&self) -> String {
        format!("{}@steam", 76561198000000000u64 + u64::from(self.id))
    }

    fn nickname(&self) -> String {
        self.nickname.clone()
    }

    fn is_verified(&self) -> bool {
        self.verified.load(Ordering::SeqCst)
    }

    fn health(&self) -> f64 {
        self.health.get()
    }

    fn set_health(&self, value: f64) {
        self.health.set(value);
    }

    fn max_health(&self) -> f64 {
        100.0
    }

    fn position(&self) -> Vec3 {
        self.position.get()
    }

    fn set_position(&self, value: Vec3) {
        self.position.set(value);
    }

    fn role(&self) -> Option<Arc<dyn HostRole>> {
        self.role.get().map(|role| role as Arc<dyn HostRole>)
    }
}

pub struct MockFpc {
    walking: Slot<f64>,
    sprinting: Slot<f64>,
    crouching: Slot<f64>,
    jumping: Slot<f64>,
    velocity: Slot<Vec3>,
    grounded: AtomicBool,
    state: Slot<MovementState>,
}

impl Default for MockFpc {
    fn default() -> Self {
        Self {
            walking: Slot::new(3.9),
            sprinting: Slot::new(5.4),
            crouching: Slot::new(1.3),
            jumping: Slot::new(4.9),
            velocity: Slot::new(Vec3::zero()),
            grounded: AtomicBool::new(true),
            state: Slot::new(MovementState::Walking),
        }
    }
}

impl HostFpcModule for MockFpc {
    fn walking_speed(&self) -> f64 {
        self.walking.get()
    }
    fn set_walking_speed(&self, value: f64) {
        self.walking.set(value);
    }
    fn sprinting_speed(&self) -> f64 {
        self.sprinting.get()
    }
    fn set_sprinting_speed(&self, value: f64) {
        self.sprinting.set(value);
    }
    fn crouching_speed(&self) -> f64 {
        self.crouching.get()
    }
    fn set_crouching_speed(&self, value: f64) {
        self.crouching.set(value);
    }
    fn jumping_speed(&self) -> f64 {
        self.jumping.get()
    }
    fn set_jumping_speed(&self, value: f64) {
        self.jumping.set(value);
    }
    fn velocity(&self) -> Vec3 {
        self.velocity.get()
    }
    fn is_grounded(&self) -> bool {
        self.grounded.load(Ordering::SeqCst)
    }
    fn movement_state(&self) -> MovementState {
        self.state.get()
    }
    fn set_movement_state(&self, value: MovementState) {
        self.state.set(value);
    }
}

pub struct MockAbility {
    cooldown: Slot<f64>,
    duration: Slot<f64>,
    base_duration: f64,
    syncs: AtomicUsize,
}

impl MockAbility {
    pub fn new(base_duration: f64) -> Self {
        Self {
            cooldown: Slot::new(0.0),
            duration: Slot::new(0.0),
            base_duration,
            syncs: AtomicUsize::new(0),
        }
    }

    /// How many times timers were pushed to clients.
    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

impl HostAbility for MockAbility {
    fn cooldown(&self) -> f64 {
        self.cooldown.get()
    }
    fn set_cooldown(&self, value: f64) {
        self.cooldown.set(value);
    }
    fn duration(&self) -> f64 {
        self.duration.get()
    }
    fn set_duration(&self, value: f64) {
        self.duration.set(value);
    }
    fn base_duration(&self) -> f64 {
        self.base_duration
    }
    fn sync(&self) {
        self.syncs.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockScp049 {
    resurrect: Option<MockAbility>,
    call: Option<MockAbility>,
    sense: Option<MockAbility>,
    attack: Option<MockAbility>,
    sense_distance: Slot<f64>,
    sense_target: Slot<Option<u32>>,
    revived: Slot<Vec<String>>,
}

impl MockScp049 {
    fn new(with_call: bool) -> Self {
        Self {
            resurrect: Some(MockAbility::new(0.0)),
            call: with_call.then(|| MockAbility::new(20.0)),
            sense: Some(MockAbility::new(20.0)),
            attack: Some(MockAbility::new(0.0)),
            sense_distance: Slot::new(100.0),
            sense_target: Slot::new(None),
            revived: Slot::new(Vec::new()),
        }
    }

    pub fn set_sense_target(&self, target: Option<u32>) {
        self.sense_target.set(target);
    }

    /// Nicknames of players revived so far.
    pub fn revived(&self) -> Vec<String> {
        self.revived.get()
    }
}

impl HostScp049Abilities for MockScp049 {
    fn resurrect_ability(&self) -> Option<&dyn HostAbility> {
        self.resurrect.as_ref().map(|a| a as &dyn HostAbility)
    }
    fn call_ability(&self) -> Option<&dyn HostAbility> {
        self.call.as_ref().map(|a| a as &dyn HostAbility)
    }
    fn sense_ability(&self) -> Option<&dyn HostAbility> {
        self.sense.as_ref().map(|a| a as &dyn HostAbility)
    }
    fn attack_ability(&self) -> Option<&dyn HostAbility> {
        self.attack.as_ref().map(|a| a as &dyn HostAbility)
    }
    fn sense_distance(&self) -> f64 {
        self.sense_distance.get()
    }
    fn set_sense_distance(&self, value: f64) {
        self.sense_distance.set(value);
    }
    fn is_recalling(&self) -> bool {
        self.resurrect.as_ref().map_or(false, HostAbility::is_active)
    }
    fn sense_target(&self) -> Option<u32> {
        self.sense_target.get()
    }
    fn lose_sense_target(&self) {
        self.sense_target.set(None);
    }
    fn revive(&self, ragdoll: &dyn HostRagdoll) -> bool {
        let mut revived = self.revived.get();
        revived.push(ragdoll.owner_nickname());
        self.revived.set(revived);
        true
    }
}

#[derive(Default)]
pub struct MockScp3114 {
    dance: Slot<Option<DanceType>>,
    disguise: Slot<Option<DisguiseStatus>>,
}

impl HostScp3114Abilities for MockScp3114 {
    fn dance_type(&self) -> DanceType {
        self.dance.get().unwrap_or_default()
    }
    fn set_dance_type(&self, value: DanceType) {
        self.dance.set(Some(value));
    }
    fn is_dancing(&self) -> bool {
        !self.dance_type().is_none()
    }
    fn disguise_status(&self) -> DisguiseStatus {
        self.disguise.get().unwrap_or_default()
    }
}

pub struct MockScp939 {
    focused: AtomicBool,
    sound_range: Slot<f64>,
}

impl MockScp939 {
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }
}

impl HostScp939Abilities for MockScp939 {
    fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
    fn sound_range(&self) -> f64 {
        self.sound_range.get()
    }
    fn set_sound_range(&self, value: f64) {
        self.sound_range.set(value);
    }
}

/// Host role object. Modules are attached according to the role type.
pub struct MockRole {
    role_type: RoleTypeId,
    active_time: Slot<f64>,
    fpc: Option<MockFpc>,
    scp049: Option<MockScp049>,
    scp3114: Option<MockScp3114>,
    scp939: Option<MockScp939>,
}

impl MockRole {
    pub fn new(role_type: RoleTypeId) -> Arc<Self> {
        Arc::new(Self::build(role_type, true))
    }

    /// SCP-049 role whose host lost its call ability.
    pub fn scp049_without_call() -> Arc<Self> {
        Arc::new(Self::build(RoleTypeId::Scp049, false))
    }

    fn build(role_type: RoleTypeId, with_call: bool) -> Self {
        Self {
            role_type,
            active_time: Slot::new(0.0),
            fpc: role_type.is_fpc_role().then(MockFpc::default),
            scp049: (role_type == RoleTypeId::Scp049).then(|| MockScp049::new(with_call)),
            scp3114: (role_type == RoleTypeId::Scp3114).then(MockScp3114::default),
            scp939: (role_type == RoleTypeId::Scp939).then(|| MockScp939 {
                focused: AtomicBool::new(false),
                sound_range: Slot::new(12.0),
            }),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.active_time.set(self.active_time.get() + seconds);
    }

    pub fn mock_scp049(&self) -> Option<&MockScp049> {
        self.scp049.as_ref()
    }

    pub fn mock_scp939(&self) -> Option<&MockScp939> {
        self.scp939.as_ref()
    }
}

impl HostRole for MockRole {
    fn role_type(&self) -> RoleTypeId {
        self.role_type
    }
    fn active_time(&self) -> f64 {
        self.active_time.get()
    }
    fn fpc(&self) -> Option<&dyn HostFpcModule> {
        self.fpc.as_ref().map(|m| m as &dyn HostFpcModule)
    }
    fn scp049(&self) -> Option<&dyn HostScp049Abilities> {
        self.scp049.as_ref().map(|m| m as &dyn HostScp049Abilities)
    }
    fn scp3114(&self) -> Option<&dyn HostScp3114Abilities> {
        self.scp3114.as_ref().map(|m| m as &dyn HostScp3114Abilities)
    }
    fn scp939(&self) -> Option<&dyn HostScp939Abilities> {
        self.scp939.as_ref().map(|m| m as &dyn HostScp939Abilities)
    }
}

pub struct MockGrenade {
    fuse_time: f64,
    exploded: AtomicBool,
}

impl HostGrenade for MockGrenade {
    fn fuse_time(&self) -> f64 {
        self.fuse_time
    }
    fn explode(&self) {
        self.exploded.store(true, Ordering::SeqCst);
    }
}

pub struct MockPickup {
    serial: u16,
    item_type: ItemType,
    position: Slot<Vec3>,
    grenade: Option<MockGrenade>,
}

impl MockPickup {
    pub fn item(serial: u16, item_type: ItemType) -> Arc<Self> {
        Arc::new(Self {
            serial,
            item_type,
            position: Slot::new(Vec3::zero()),
            grenade: None,
        })
    }

    pub fn grenade(serial: u16, item_type: ItemType, fuse_time: f64) -> Arc<Self> {
        Arc::new(Self {
            serial,
            item_type,
            position: Slot::new(Vec3::zero()),
            grenade: Some(MockGrenade {
                fuse_time,
                exploded: AtomicBool::new(false),
            }),
        })
    }

    pub fn set_position(&self, position: Vec3) {
        self.position.set(position);
    }

    pub fn exploded(&self) -> bool {
        self.grenade
            .as_ref()
            .map_or(false, |g| g.exploded.load(Ordering::SeqCst))
    }
}

impl HostPickup for MockPickup {
    fn serial(&self) -> u16 {
        self.serial
    }
    fn item_type(&self) -> ItemType {
        self.item_type
    }
    fn position(&self) -> Vec3 {
        self.position.get()
    }
    fn weight(&self) -> f64 {
        if self.item_type.is_throwable() { 0.7 } else { 0.5 }
    }
    fn is_locked(&self) -> bool {
        false
    }
    fn grenade(&self) -> Option<&dyn HostGrenade> {
        self.grenade.as_ref().map(|g| g as &dyn HostGrenade)
    }
}

pub struct MockProjectile {
    fuse_time: Slot<f64>,
}

impl MockProjectile {
    pub fn new(fuse_time: f64) -> Arc<Self> {
        Arc::new(Self { fuse_time: Slot::new(fuse_time) })
    }
}

impl HostProjectile for MockProjectile {
    fn fuse_time(&self) -> f64 {
        self.fuse_time.get()
    }
    fn set_fuse_time(&self, value: f64) {
        self.fuse_time.set(value);
    }
}

pub struct MockScp3114Ragdoll {
    disguise_role: Slot<RoleTypeId>,
    reveal_delay: Slot<f64>,
    reveal_duration: Slot<f64>,
    reveal_elapsed: Slot<f64>,
    playing: AtomicBool,
}

impl HostScp3114Ragdoll for MockScp3114Ragdoll {
    fn disguise_role(&self) -> RoleTypeId {
        self.disguise_role.get()
    }
    fn set_disguise_role(&self, value: RoleTypeId) {
        self.disguise_role.set(value);
    }
    fn reveal_delay(&self) -> f64 {
        self.reveal_delay.get()
    }
    fn set_reveal_delay(&self, value: f64) {
        self.reveal_delay.set(value);
    }
    fn reveal_duration(&self) -> f64 {
        self.reveal_duration.get()
    }
    fn set_reveal_duration(&self, value: f64) {
        self.reveal_duration.set(value);
    }
    fn reveal_elapsed(&self) -> f64 {
        self.reveal_elapsed.get()
    }
    fn set_reveal_elapsed(&self, value: f64) {
        self.reveal_elapsed.set(value);
    }
    fn is_playing_animation(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
    fn set_playing_animation(&self, value: bool) {
        self.playing.store(value, Ordering::SeqCst);
    }
}

pub struct MockRagdoll {
    owner: String,
    owner_id: Option<u32>,
    role_type: RoleTypeId,
    scp3114: Option<MockScp3114Ragdoll>,
}

impl MockRagdoll {
    pub fn basic(owner: &str, role_type: RoleTypeId) -> Arc<Self> {
        Arc::new(Self {
            owner: owner.to_string(),
            owner_id: None,
            role_type,
            scp3114: None,
        })
    }

    pub fn scp3114(owner: &str, disguise: RoleTypeId) -> Arc<Self> {
        Arc::new(Self {
            owner: owner.to_string(),
            owner_id: None,
            role_type: disguise,
            scp3114: Some(MockScp3114Ragdoll {
                disguise_role: Slot::new(disguise),
                reveal_delay: Slot::new(0.5),
                reveal_duration: Slot::new(3.0),
                reveal_elapsed: Slot::new(0.0),
                playing: AtomicBool::new(false),
            }),
        })
    }

    pub fn owned_by(owner: &str, owner_id: u32, role_type: RoleTypeId) -> Arc<Self> {
        Arc::new(Self {
            owner: owner.to_string(),
            owner_id: Some(owner_id),
            role_type,
            scp3114: None,
        })
    }
}

impl HostRagdoll for MockRagdoll {
    fn owner_nickname(&self) -> String {
        self.owner.clone()
    }
    fn owner_id(&self) -> Option<u32> {
        self.owner_id
    }
    fn role_type(&self) -> RoleTypeId {
        self.role_type
    }
    fn position(&self) -> Vec3 {
        Vec3::zero()
    }
    fn scp3114(&self) -> Option<&dyn HostScp3114Ragdoll> {
        self.scp3114.as_ref().map(|r| r as &dyn HostScp3114Ragdoll)
    }
}

pub struct MockDoor {
    name: String,
    health: Slot<f64>,
    max_health: f64,
    open: AtomicBool,
    destroyed: AtomicBool,
}

impl MockDoor {
    pub fn new(name: &str, health: f64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            health: Slot::new(health),
            max_health: health,
            open: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}

impl HostDoor for MockDoor {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn health(&self) -> f64 {
        self.health.get()
    }
    fn set_health(&self, value: f64) {
        self.health.set(value);
    }
    fn max_health(&self) -> f64 {
        self.max_health
    }
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
    fn destroy(&self) {
        self.health.set(0.0);
        self.destroyed.store(true, Ordering::SeqCst);
    }
}
