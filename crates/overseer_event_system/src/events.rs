//! # Event Traits and Handlers
//!
//! The fundamental [`Event`] trait, the [`Deniable`] capability for payloads
//! the host may veto, and the [`EventHandler`] abstraction every bus stores.
//!
//! Payloads are passed to handlers by mutable reference: handlers observe an
//! event by reading it and influence the outcome by mutating it (the allow
//! flag, damage amounts, target lists). Nothing is returned besides a
//! success/failure result, which the bus only uses for logging.

use std::fmt::Debug;
use std::marker::PhantomData;

use compact_str::CompactString;
use overseer_api::SurrogateError;

/// Core trait that all event payloads implement.
///
/// Events must be Send + Sync as they may be raised from whichever thread
/// the host drives its tick on. The Debug requirement ensures events can be
/// logged when a handler faults.
pub trait Event: Send + Sync + Debug + 'static {
    /// Stable `"category:name"` identifier used in logs and reports.
    fn event_type() -> &'static str
    where
        Self: Sized;
}

/// Payloads carrying a mutable allow flag the host consults after dispatch.
///
/// The flag starts out `true`. Any handler may clear it; whether a later
/// handler may set it again is decided by the bus's
/// [`DenialPolicy`](crate::system::DenialPolicy).
pub trait Deniable: Event {
    fn is_allowed(&self) -> bool;

    fn set_allowed(&mut self, allowed: bool);

    /// Shorthand for `set_allowed(false)`.
    fn deny(&mut self) {
        self.set_allowed(false);
    }
}

/// Handler trait for processing one event kind.
///
/// Most users will not implement this trait directly, but instead register
/// closures through [`EventBus::on`](crate::system::EventBus::on), which wraps
/// them in a [`TypedEventHandler`].
pub trait EventHandler<T: Event>: Send + Sync + 'static {
    /// Handles one firing of the event.
    ///
    /// Returning `Err` (or panicking) is a subscriber fault: it is logged and
    /// the remaining handlers still run.
    fn handle(&self, event: &mut T) -> Result<(), EventError>;

    /// Returns a human-readable name for this handler for diagnostics.
    fn handler_name(&self) -> &str;
}

/// Named closure handler.
///
/// # Examples
///
/// ```rust
/// use overseer_event_system::{EventHandler, TypedEventHandler, GeneratedEvent};
///
/// let handler = TypedEventHandler::new("map_logger", |event: &mut GeneratedEvent| {
///     println!("map generated with seed {}", event.seed);
///     Ok(())
/// });
/// assert_eq!(handler.handler_name(), "map_logger");
/// ```
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
{
    handler: F,
    name: CompactString,
    _phantom: PhantomData<fn(&mut T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<CompactString>, handler: F) -> Self {
        Self {
            handler,
            name: name.into(),
            _phantom: PhantomData,
        }
    }
}

impl<T, F> EventHandler<T> for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
{
    fn handle(&self, event: &mut T) -> Result<(), EventError> {
        (self.handler)(event)
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

impl<T, F> Debug for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEventHandler")
            .field("name", &self.name)
            .field("event", &T::event_type())
            .finish()
    }
}

/// Identifies one subscription on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct HandlerId(pub u64);

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can occur during event handling.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Handler execution failed during event processing
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
    /// Handler panicked; the message is the panic payload
    #[error("Handler panicked: {0}")]
    HandlerPanicked(String),
    /// No handler found for the specified id or name
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),
    /// A write through a surrogate was rejected or hit a destroyed host object
    #[error("Surrogate error: {0}")]
    Surrogate(#[from] SurrogateError),
}
