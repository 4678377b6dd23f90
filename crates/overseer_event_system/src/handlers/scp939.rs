use crate::args::scp939::PlayingFootstepEvent;
use crate::handler_group;

handler_group! {
    Scp939Handlers {
        /// Deniable.
        playing_footstep: PlayingFootstepEvent,
    }
}
