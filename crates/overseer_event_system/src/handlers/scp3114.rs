use crate::args::scp3114::DancingEvent;
use crate::handler_group;

handler_group! {
    Scp3114Handlers {
        /// Deniable. The dance type is read and written through the role.
        dancing: DancingEvent,
    }
}
