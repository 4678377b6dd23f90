use crate::args::map::{
    DamagingDoorEvent, DestroyedDoorEvent, DestroyingDoorEvent, ExplodingGrenadeEvent, GeneratedEvent,
    PickupAddedEvent, PickupDestroyedEvent,
};
use crate::handler_group;

handler_group! {
    /// Events raised by the facility itself.
    MapHandlers {
        /// Deniable. The damage amount may be rewritten.
        door_damaging: DamagingDoorEvent,
        /// Deniable. A denied door keeps its remaining health.
        door_destroying: DestroyingDoorEvent,
        door_destroyed: DestroyedDoorEvent,
        /// Deniable. Only players left in the target list are affected.
        exploding_grenade: ExplodingGrenadeEvent,
        pickup_added: PickupAddedEvent,
        pickup_destroyed: PickupDestroyedEvent,
        generated: GeneratedEvent,
    }
}
