//! Event payload types, grouped by the subsystem that raises them.

pub mod map;
pub mod player;
pub mod scp049;
pub mod scp3114;
pub mod scp939;

pub use map::{
    DamagingDoorEvent, DestroyedDoorEvent, DestroyingDoorEvent, ExplodingGrenadeEvent, GeneratedEvent,
    PickupAddedEvent, PickupDestroyedEvent,
};
pub use player::{ChangedRoleEvent, ChangingRoleEvent, HurtingEvent, LeftEvent, VerifiedEvent};
pub use scp049::SendingCallEvent;
pub use scp3114::DancingEvent;
pub use scp939::PlayingFootstepEvent;
