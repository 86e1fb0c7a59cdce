use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use crate::callbacks::EventHandler;

/// Event names the container runtime is known to emit. Unknown names are
/// legal on both sides of the registry; new runtime versions may add events
/// without a core release.
pub const EVENT_AUTHORIZED: &str = "authorized";
pub const EVENT_LOCKED: &str = "locked";
pub const EVENT_WIPED: &str = "wiped";
pub const EVENT_UPDATE_CONFIG: &str = "update_config";

/// Unique id for one handler registration, returned by `on` and accepted by
/// `off`. Callback identity does not survive the FFI boundary, so removal is
/// by id rather than by function pointer.
pub type HandlerId = u64;

/// Payload shapes the runtime delivers. Shapes vary by platform and runtime
/// version; anything the core cannot name yet arrives as [EventPayload::Opaque].
#[derive(Clone, Debug, PartialEq, uniffi::Enum, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    Empty,
    Message { text: String },
    ConfigUpdate { entries: HashMap<String, String> },
    Opaque { raw: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq, uniffi::Record, serde::Serialize, serde::Deserialize)]
pub struct RuntimeEvent {
    pub name: String,
    pub payload: EventPayload,
}

impl RuntimeEvent {
    pub fn new(name: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

struct Registration {
    id: HandlerId,
    handler: Arc<dyn EventHandler>,
}

/// Process-wide event-name to handler mapping.
///
/// Registrations for one name are kept in registration order and persist
/// until removed or process teardown. Dispatch iterates a snapshot taken
/// under the lock, so `on`/`off` from a handler body (or another thread)
/// cannot skip or double-invoke anyone mid-pass.
#[derive(Default)]
pub struct EventRegistry {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<String, Vec<Registration>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`. Unknown event names register
    /// silently.
    pub fn register(&self, event: &str, handler: Arc<dyn EventHandler>) -> HandlerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut handlers = self.handlers.lock().unwrap();
        handlers
            .entry(event.to_owned())
            .or_default()
            .push(Registration { id, handler });
        id
    }

    /// Removes the registration with `id`, or every registration for
    /// `event` when `id` is `None`. No-op if nothing matches.
    pub fn unregister(&self, event: &str, id: Option<HandlerId>) {
        let mut handlers = self.handlers.lock().unwrap();
        match id {
            Some(id) => {
                if let Some(list) = handlers.get_mut(event) {
                    list.retain(|reg| reg.id != id);
                }
            }
            None => {
                handlers.remove(event);
            }
        }
    }

    /// Invokes every handler registered for `event.name`, in registration
    /// order, exactly once each. Returns how many handlers ran.
    pub fn dispatch(&self, event: &RuntimeEvent) -> usize {
        let snapshot: Vec<Arc<dyn EventHandler>> = {
            let handlers = self.handlers.lock().unwrap();
            handlers
                .get(&event.name)
                .map(|list| list.iter().map(|reg| reg.handler.clone()).collect())
                .unwrap_or_default()
        };

        for handler in &snapshot {
            handler.on_event(event.clone());
        }

        snapshot.len()
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(event)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingHandler {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EventHandler for RecordingHandler {
        fn on_event(&self, event: RuntimeEvent) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.name));
        }
    }

    fn handler(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn EventHandler> {
        Arc::new(RecordingHandler {
            label,
            log: log.clone(),
        })
    }

    #[test]
    fn dispatch_runs_handlers_in_registration_order() {
        let registry = EventRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(EVENT_AUTHORIZED, handler("first", &log));
        registry.register(EVENT_AUTHORIZED, handler("second", &log));

        let ran = registry.dispatch(&RuntimeEvent::new(EVENT_AUTHORIZED, EventPayload::Empty));

        assert_eq!(ran, 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:authorized", "second:authorized"]
        );
    }

    #[test]
    fn unregister_by_id_leaves_other_handlers() {
        let registry = EventRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = registry.register(EVENT_LOCKED, handler("first", &log));
        registry.register(EVENT_LOCKED, handler("second", &log));

        registry.unregister(EVENT_LOCKED, Some(first));
        registry.dispatch(&RuntimeEvent::new(EVENT_LOCKED, EventPayload::Empty));

        assert_eq!(*log.lock().unwrap(), vec!["second:locked"]);
    }

    #[test]
    fn unregister_all_silences_the_event() {
        let registry = EventRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(EVENT_WIPED, handler("first", &log));
        registry.register(EVENT_WIPED, handler("second", &log));

        registry.unregister(EVENT_WIPED, None);
        let ran = registry.dispatch(&RuntimeEvent::new(EVENT_WIPED, EventPayload::Empty));

        assert_eq!(ran, 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn unregister_unknown_event_is_a_noop() {
        let registry = EventRegistry::new();
        registry.unregister("never_registered", None);
        registry.unregister("never_registered", Some(7));
    }

    #[test]
    fn dispatch_to_unknown_event_runs_nothing() {
        let registry = EventRegistry::new();
        let ran = registry.dispatch(&RuntimeEvent::new("unheard_of", EventPayload::Empty));
        assert_eq!(ran, 0);
    }

    // A handler that mutates the registry mid-dispatch must not affect the
    // pass that is already running.
    struct SelfRemovingHandler {
        registry: Arc<EventRegistry>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EventHandler for SelfRemovingHandler {
        fn on_event(&self, event: RuntimeEvent) {
            self.registry.unregister(&event.name, None);
            self.log.lock().unwrap().push("remover".to_owned());
        }
    }

    #[test]
    fn dispatch_iterates_a_stable_snapshot() {
        let registry = Arc::new(EventRegistry::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.register(
            EVENT_UPDATE_CONFIG,
            Arc::new(SelfRemovingHandler {
                registry: registry.clone(),
                log: log.clone(),
            }),
        );
        registry.register(EVENT_UPDATE_CONFIG, handler("tail", &log));

        let ran = registry.dispatch(&RuntimeEvent::new(EVENT_UPDATE_CONFIG, EventPayload::Empty));

        // Both handlers from the snapshot ran despite the first removing all.
        assert_eq!(ran, 2);
        assert_eq!(*log.lock().unwrap(), vec!["remover", "tail:update_config"]);
        assert_eq!(registry.handler_count(EVENT_UPDATE_CONFIG), 0);
    }
}
