use crate::args::scp049::SendingCallEvent;
use crate::handler_group;

handler_group! {
    Scp049Handlers {
        /// Deniable. The call duration may be rewritten.
        sending_call: SendingCallEvent,
    }
}
