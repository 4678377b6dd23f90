//! Bus machinery: the per-event bus, its denial policy and statistics.

mod bus;
mod policy;
mod stats;

#[cfg(test)]
mod tests;

pub use bus::EventBus;
pub(crate) use bus::panic_message;
pub use policy::{DenialPolicy, EventSettings};
pub use stats::{BusReport, EventBusStats};
