//! # Event Bus
//!
//! One bus per event kind. A bus is an ordered handler registry plus the
//! safe invoker:
//!
//! * handlers run in subscription order, duplicates included
//! * every invocation iterates a snapshot taken when it starts, so handlers
//!   may subscribe, unsubscribe or re-enter the bus while it runs
//! * a handler returning `Err` or panicking is logged and skipped over; the
//!   remaining handlers still run and the caller never sees the failure
//!
//! No lock is held while a handler runs.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::{debug, error, warn};

use crate::events::{Deniable, Event, EventError, EventHandler, HandlerId, TypedEventHandler};

use super::policy::{DenialPolicy, EventSettings};
use super::stats::{BusCounters, BusReport, EventBusStats};

struct Subscription<T: Event> {
    id: HandlerId,
    handler: Arc<dyn EventHandler<T>>,
}

impl<T: Event> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
        }
    }
}

type Snapshot<T> = SmallVec<[Subscription<T>; 4]>;

/// Ordered handler registry and safe invoker for one event kind.
pub struct EventBus<T: Event> {
    subscriptions: RwLock<Snapshot<T>>,
    next_id: AtomicU64,
    policy: DenialPolicy,
    warn_on_missing_handlers: bool,
    counters: BusCounters,
}

impl<T: Event> EventBus<T> {
    pub fn new() -> Self {
        Self::with_settings(&EventSettings::default())
    }

    pub fn with_settings(settings: &EventSettings) -> Self {
        Self {
            subscriptions: RwLock::new(SmallVec::new()),
            next_id: AtomicU64::new(1),
            policy: settings.denial_policy,
            warn_on_missing_handlers: settings.warn_on_missing_handlers,
            counters: BusCounters::default(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        T::event_type()
    }

    pub fn policy(&self) -> DenialPolicy {
        self.policy
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot<T>> {
        self.subscriptions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot<T>> {
        self.subscriptions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a closure under `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use overseer_event_system::{EventBus, GeneratedEvent};
    ///
    /// let bus: EventBus<GeneratedEvent> = EventBus::new();
    /// let id = bus.on("seed_logger", |event: &mut GeneratedEvent| {
    ///     println!("seed {}", event.seed);
    ///     Ok(())
    /// });
    /// assert_eq!(bus.handler_count(), 1);
    /// assert!(bus.unsubscribe(id));
    /// ```
    pub fn on<F>(&self, name: impl Into<CompactString>, handler: F) -> HandlerId
    where
        F: Fn(&mut T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(TypedEventHandler::new(name, handler)))
    }

    /// Appends a handler. Subscribing the same handler twice makes it run twice.
    pub fn subscribe(&self, handler: Arc<dyn EventHandler<T>>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("📝 Subscribed {} {} to {}", handler.handler_name(), id, T::event_type());
        self.write().push(Subscription { id, handler });
        id
    }

    /// Removes the subscription with this id. False if it is not registered.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut subscriptions = self.write();
        match subscriptions.iter().position(|sub| sub.id == id) {
            Some(index) => {
                subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes the first subscription of this exact handler object.
    /// Repeated calls remove repeated subscriptions one at a time.
    pub fn unsubscribe_handler(&self, handler: &Arc<dyn EventHandler<T>>) -> bool {
        let mut subscriptions = self.write();
        match subscriptions.iter().position(|sub| Arc::ptr_eq(&sub.handler, handler)) {
            Some(index) => {
                subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Strict variant of [`unsubscribe`](Self::unsubscribe).
    pub fn try_unsubscribe(&self, id: HandlerId) -> Result<(), EventError> {
        if self.unsubscribe(id) {
            Ok(())
        } else {
            Err(EventError::HandlerNotFound(format!("{} on {}", id, T::event_type())))
        }
    }

    pub fn handler_count(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Handler names in subscription order.
    pub fn handler_names(&self) -> Vec<String> {
        self.read()
            .iter()
            .map(|sub| sub.handler.handler_name().to_string())
            .collect()
    }

    fn snapshot(&self) -> Snapshot<T> {
        self.read().clone()
    }

    /// Calls every handler once, in subscription order, isolating failures.
    pub fn invoke_safely(&self, event: &mut T) {
        self.dispatch(event, |_, _| {});
    }

    fn dispatch(&self, event: &mut T, mut after_each: impl FnMut(&Subscription<T>, &mut T)) {
        self.counters.invocation();
        let snapshot = self.snapshot();

        if snapshot.is_empty() {
            if self.warn_on_missing_handlers {
                warn!("⚠️ No handlers for event: {}", T::event_type());
            }
            return;
        }

        for subscription in snapshot.iter() {
            self.run(subscription, event);
            after_each(subscription, event);
        }
    }

    fn run(&self, subscription: &Subscription<T>, event: &mut T) {
        let handler = &subscription.handler;
        let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(event)));

        match outcome {
            Ok(Ok(())) => self.counters.handler_ran(),
            Ok(Err(e)) => {
                self.counters.fault();
                error!(
                    event = T::event_type(),
                    handler = handler.handler_name(),
                    handler_id = subscription.id.0,
                    "❌ Handler {} failed: {}",
                    handler.handler_name(),
                    e
                );
            }
            Err(panic) => {
                self.counters.panic();
                let e = EventError::HandlerPanicked(panic_message(panic.as_ref()));
                error!(
                    event = T::event_type(),
                    handler = handler.handler_name(),
                    handler_id = subscription.id.0,
                    "💥 Handler {} failed: {}",
                    handler.handler_name(),
                    e
                );
            }
        }
    }

    pub fn stats(&self) -> EventBusStats {
        self.counters.snapshot()
    }

    pub fn report(&self) -> BusReport {
        BusReport {
            event: T::event_type(),
            handlers: self.handler_count(),
            stats: self.stats(),
        }
    }
}

impl<T: Deniable> EventBus<T> {
    /// Runs the safe invoker and returns the final allow flag.
    ///
    /// All handlers run whether or not the event is already denied. Under
    /// [`DenialPolicy::Sticky`] a denial cannot be undone by later handlers.
    pub fn invoke_deniable(&self, event: &mut T) -> bool {
        match self.policy {
            DenialPolicy::LastWriteWins => self.invoke_safely(event),
            DenialPolicy::Sticky => {
                let mut denied_by: Option<CompactString> = (!event.is_allowed()).then(|| "<caller>".into());

                self.dispatch(event, |subscription, event| {
                    let name = subscription.handler.handler_name();
                    if let Some(first) = &denied_by {
                        if event.is_allowed() {
                            warn!(
                                event = T::event_type(),
                                handler = name,
                                "🚫 Handler {} tried to re-allow an event denied by {}, keeping it denied",
                                name,
                                first
                            );
                            event.set_allowed(false);
                        }
                    } else if !event.is_allowed() {
                        denied_by = Some(name.into());
                    }
                });
            }
        }

        let allowed = event.is_allowed();
        if !allowed {
            self.counters.denial();
        }
        allowed
    }
}

impl<T: Event> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Event> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event", &T::event_type())
            .field("handlers", &self.handler_count())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
