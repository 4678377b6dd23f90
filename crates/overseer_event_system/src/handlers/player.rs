use crate::args::player::{ChangedRoleEvent, ChangingRoleEvent, HurtingEvent, LeftEvent, VerifiedEvent};
use crate::handler_group;

handler_group! {
    /// Player lifecycle and damage events.
    PlayerHandlers {
        /// A player finished authentication.
        verified: VerifiedEvent,
        /// A player disconnected.
        left: LeftEvent,
        /// Deniable. The new role type may be rewritten.
        changing_role: ChangingRoleEvent,
        changed_role: ChangedRoleEvent,
        /// Deniable. The damage amount may be rewritten.
        hurting: HurtingEvent,
    }
}
