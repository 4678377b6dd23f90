//! # Overseer Event System
//!
//! Typed, in-process event buses for extensions that observe and influence
//! a host game simulation.
//!
//! ## Key Features
//!
//! - **One bus per event kind**: [`EventBus<T>`] is an ordered handler list
//!   with a safe invoker; handler faults and panics are isolated and logged
//! - **Cooperative cancellation**: payloads implementing [`Deniable`] carry an
//!   allow flag the host consults after dispatch, under a configurable
//!   [`DenialPolicy`]
//! - **Surrogate payloads**: events reference managed surrogates from
//!   [`overseer_api`], never raw host objects
//! - **Plugins**: [`PluginManager`] drives in-process extensions with the same
//!   fault isolation
//!
//! ## Quick Start
//!
//! ```rust
//! use overseer_event_system::{Events, GeneratedEvent};
//!
//! let events = Events::default();
//! events.map.generated.on("seed_logger", |event: &mut GeneratedEvent| {
//!     println!("facility generated with seed {}", event.seed);
//!     Ok(())
//! });
//!
//! let mut event = GeneratedEvent::new(42);
//! events.map.generated.invoke_safely(&mut event);
//! assert_eq!(events.report().total_invocations, 1);
//! ```

mod macros;

pub mod args;
pub mod events;
pub mod handlers;
pub mod plugin;
pub mod shutdown;
pub mod system;

pub use args::{
    ChangedRoleEvent, ChangingRoleEvent, DamagingDoorEvent, DancingEvent, DestroyedDoorEvent, DestroyingDoorEvent,
    ExplodingGrenadeEvent, GeneratedEvent, HurtingEvent, LeftEvent, PickupAddedEvent, PickupDestroyedEvent,
    PlayingFootstepEvent, SendingCallEvent, VerifiedEvent,
};
pub use events::{Deniable, Event, EventError, EventHandler, HandlerId, TypedEventHandler};
pub use handlers::{Events, EventsReport, MapHandlers, PlayerHandlers, Scp049Handlers, Scp3114Handlers, Scp939Handlers};
pub use plugin::{ExtensionContext, Plugin, PluginError, PluginManager};
pub use shutdown::ShutdownState;
pub use system::{BusReport, DenialPolicy, EventBus, EventBusStats, EventSettings};

pub use overseer_api;
