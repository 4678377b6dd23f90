use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use overseer_api::host::HostDoor;
use overseer_api::mock::MockDoor;
use overseer_api::Surrogates;

use super::*;
use crate::args::DestroyingDoorEvent;
use crate::events::{Deniable, EventError, EventHandler, HandlerId, TypedEventHandler};
use crate::{impl_deniable, impl_event};

#[derive(Debug, Default)]
struct Probe {
    trace: Vec<&'static str>,
    depth: u8,
    is_allowed: bool,
}

impl Probe {
    fn new() -> Self {
        Self {
            is_allowed: true,
            ..Self::default()
        }
    }
}

impl_event!(Probe => "test:probe");
impl_deniable!(Probe);

fn tracer(label: &'static str) -> impl Fn(&mut Probe) -> Result<(), EventError> + Send + Sync + 'static {
    move |event: &mut Probe| {
        event.trace.push(label);
        Ok(())
    }
}

fn sticky() -> EventSettings {
    EventSettings {
        denial_policy: DenialPolicy::Sticky,
        ..EventSettings::default()
    }
}

#[test]
fn test_handlers_run_in_subscription_order() {
    let bus = EventBus::<Probe>::new();
    bus.on("a", tracer("A"));
    bus.on("b", tracer("B"));
    bus.on("c", tracer("C"));

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);

    assert_eq!(event.trace, vec!["A", "B", "C"]);
    assert_eq!(bus.handler_names(), vec!["a", "b", "c"]);
}

#[test]
fn test_invoke_without_handlers_is_a_no_op() {
    let bus = EventBus::<Probe>::with_settings(&EventSettings {
        warn_on_missing_handlers: true,
        ..EventSettings::default()
    });
    let mut event = Probe::new();

    assert!(bus.invoke_deniable(&mut event));
    assert!(event.trace.is_empty());
    assert_eq!(bus.stats().invocations, 1);
}

#[test]
fn test_failing_handler_does_not_stop_the_rest() {
    let bus = EventBus::<Probe>::new();
    bus.on("a", tracer("A"));
    bus.on("failing", |event: &mut Probe| {
        event.trace.push("B");
        Err(EventError::HandlerExecution("boom".to_string()))
    });
    bus.on("c", tracer("C"));

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);

    assert_eq!(event.trace, vec!["A", "B", "C"]);
    let stats = bus.stats();
    assert_eq!(stats.faults, 1);
    assert_eq!(stats.handler_runs, 2);
}

#[test]
fn test_panicking_handler_does_not_stop_the_rest() {
    let bus = EventBus::<Probe>::new();
    bus.on("a", tracer("A"));
    bus.on("panicking", |_: &mut Probe| panic!("handler exploded"));
    bus.on("c", tracer("C"));

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);

    assert_eq!(event.trace, vec!["A", "C"]);
    assert_eq!(bus.stats().panics, 1);

    // The bus keeps working after a panic.
    let mut again = Probe::new();
    bus.invoke_safely(&mut again);
    assert_eq!(again.trace, vec!["A", "C"]);
}

#[test]
fn test_duplicate_subscription_runs_twice() {
    let bus = EventBus::<Probe>::new();
    let handler: Arc<dyn EventHandler<Probe>> = Arc::new(TypedEventHandler::new("dup", tracer("D")));
    bus.subscribe(handler.clone());
    bus.subscribe(handler.clone());

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["D", "D"]);

    assert!(bus.unsubscribe_handler(&handler));
    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["D"]);

    assert!(bus.unsubscribe_handler(&handler));
    assert!(!bus.unsubscribe_handler(&handler));
    assert!(bus.is_empty());
}

#[test]
fn test_unsubscribe_by_id() {
    let bus = EventBus::<Probe>::new();
    bus.on("a", tracer("A"));
    let b = bus.on("b", tracer("B"));
    bus.on("c", tracer("C"));

    assert!(bus.unsubscribe(b));
    assert!(!bus.unsubscribe(b));
    assert!(matches!(bus.try_unsubscribe(b), Err(EventError::HandlerNotFound(_))));
    assert!(!bus.unsubscribe(HandlerId(9_999)));

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["A", "C"]);
}

#[test]
fn test_handler_ids_are_unique() {
    let bus = EventBus::<Probe>::new();
    let first = bus.on("a", tracer("A"));
    let second = bus.on("a", tracer("A"));
    assert_ne!(first, second);
}

#[test]
fn test_handler_may_unsubscribe_itself_during_invoke() {
    let bus = Arc::new(EventBus::<Probe>::new());
    let own_id: Arc<Mutex<Option<HandlerId>>> = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&bus);
    let slot = own_id.clone();
    let id = bus.on("once", move |event: &mut Probe| {
        event.trace.push("once");
        if let (Some(bus), Some(id)) = (weak.upgrade(), *slot.lock().unwrap()) {
            bus.unsubscribe(id);
        }
        Ok(())
    });
    *own_id.lock().unwrap() = Some(id);
    bus.on("after", tracer("after"));

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["once", "after"]);

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["after"]);
}

#[test]
fn test_subscribe_during_invoke_applies_to_next_invocation() {
    let bus = Arc::new(EventBus::<Probe>::new());
    let weak = Arc::downgrade(&bus);
    let added = Arc::new(AtomicUsize::new(0));

    let counter = added.clone();
    bus.on("adder", move |event: &mut Probe| {
        event.trace.push("adder");
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Some(bus) = weak.upgrade() {
                bus.on("late", tracer("late"));
            }
        }
        Ok(())
    });

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["adder"]);

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["adder", "late"]);
}

#[test]
fn test_reentrant_invoke() {
    let bus = Arc::new(EventBus::<Probe>::new());
    let weak = Arc::downgrade(&bus);

    bus.on("outer", move |event: &mut Probe| {
        event.trace.push("outer");
        if event.depth == 0 {
            if let Some(bus) = weak.upgrade() {
                let mut nested = Probe {
                    depth: 1,
                    ..Probe::new()
                };
                bus.invoke_safely(&mut nested);
                event.trace.extend(nested.trace);
            }
        }
        Ok(())
    });

    let mut event = Probe::new();
    bus.invoke_safely(&mut event);
    assert_eq!(event.trace, vec!["outer", "outer"]);
    assert_eq!(bus.stats().invocations, 2);
}

#[test]
fn test_deniable_defaults_to_allowed() {
    let bus = EventBus::<Probe>::new();
    bus.on("observer", tracer("observer"));

    let mut event = Probe::new();
    assert!(bus.invoke_deniable(&mut event));
    assert_eq!(bus.stats().denials, 0);
}

#[test]
fn test_repeated_denials_converge() {
    let bus = EventBus::<Probe>::new();
    for _ in 0..3 {
        bus.on("denier", |event: &mut Probe| {
            event.deny();
            Ok(())
        });
    }

    let mut event = Probe::new();
    assert!(!bus.invoke_deniable(&mut event));
    assert_eq!(bus.stats().denials, 1);
}

#[test]
fn test_last_write_wins_lets_later_handler_reallow() {
    let bus = EventBus::<Probe>::new();
    assert_eq!(bus.policy(), DenialPolicy::LastWriteWins);
    bus.on("denier", |event: &mut Probe| {
        event.deny();
        Ok(())
    });
    bus.on("override", |event: &mut Probe| {
        event.set_allowed(true);
        Ok(())
    });

    let mut event = Probe::new();
    assert!(bus.invoke_deniable(&mut event));
}

#[test]
fn test_sticky_denial_survives_later_reallow() {
    let bus = EventBus::<Probe>::with_settings(&sticky());
    bus.on("denier", |event: &mut Probe| {
        event.trace.push("denier");
        event.deny();
        Ok(())
    });
    bus.on("override", |event: &mut Probe| {
        event.trace.push("override");
        event.set_allowed(true);
        Ok(())
    });
    bus.on("observer", |event: &mut Probe| {
        event.trace.push(if event.is_allowed { "saw_allowed" } else { "saw_denied" });
        Ok(())
    });

    let mut event = Probe::new();
    assert!(!bus.invoke_deniable(&mut event));
    // Denial does not short-circuit: every handler still ran.
    assert_eq!(event.trace, vec!["denier", "override", "saw_denied"]);
}

#[test]
fn test_sticky_honours_caller_denial() {
    let bus = EventBus::<Probe>::with_settings(&sticky());
    bus.on("override", |event: &mut Probe| {
        event.set_allowed(true);
        Ok(())
    });

    let mut event = Probe {
        is_allowed: false,
        ..Probe::new()
    };
    assert!(!bus.invoke_deniable(&mut event));
}

#[test]
fn test_clear_and_report() {
    let bus = EventBus::<Probe>::new();
    bus.on("a", tracer("A"));
    bus.on("b", tracer("B"));
    let mut event = Probe::new();
    bus.invoke_safely(&mut event);

    let report = bus.report();
    assert_eq!(report.event, "test:probe");
    assert_eq!(report.handlers, 2);
    assert_eq!(report.stats.handler_runs, 2);

    bus.clear();
    assert!(bus.is_empty());
    assert_eq!(bus.handler_count(), 0);
}

#[test]
fn test_panic_message_extracts_payloads() {
    let literal = std::panic::catch_unwind(|| panic!("literal")).unwrap_err();
    assert_eq!(panic_message(literal.as_ref()), "literal");

    let formatted = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
    assert_eq!(panic_message(formatted.as_ref()), "code 7");
}

fn door_guard() -> EventBus<DestroyingDoorEvent> {
    let bus = EventBus::new();
    bus.on("door_guard", |event: &mut DestroyingDoorEvent| {
        if event.health() > 0.0 {
            event.deny();
        }
        Ok(())
    });
    bus
}

#[test]
fn test_door_guard_denies_while_health_remains() {
    let surrogates = Surrogates::new();
    let host: Arc<dyn HostDoor> = MockDoor::new("LCZ_ARMORY", 5.0);
    let door = surrogates.door(Some(&host)).unwrap();

    let bus = door_guard();
    let mut event = DestroyingDoorEvent::new(door);
    assert!(!bus.invoke_deniable(&mut event));
}

#[test]
fn test_door_guard_allows_broken_door() {
    let surrogates = Surrogates::new();
    let host: Arc<dyn HostDoor> = MockDoor::new("HCZ_049", 0.0);
    let door = surrogates.door(Some(&host)).unwrap();

    let bus = door_guard();
    let mut event = DestroyingDoorEvent::new(door);
    assert!(bus.invoke_deniable(&mut event));
}

#[test]
fn test_door_guard_treats_vanished_door_as_broken() {
    let surrogates = Surrogates::new();
    let host: Arc<dyn HostDoor> = MockDoor::new("GATE_A", 30.0);
    let door = surrogates.door(Some(&host)).unwrap();
    drop(host);

    let bus = door_guard();
    let mut event = DestroyingDoorEvent::new(door);
    assert!(bus.invoke_deniable(&mut event));
}
