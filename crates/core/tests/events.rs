mod common;

use std::sync::{Arc, Mutex};

use common::host_builder;
use dynamics_bridge_core::{EventHandler, EventPayload, RuntimeEvent};
use pretty_assertions::assert_eq;

struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl EventHandler for Recorder {
    fn on_event(&self, event: RuntimeEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.label, event.name));
    }
}

fn recorder(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Box<Recorder> {
    Box::new(Recorder {
        label,
        log: log.clone(),
    })
}

#[tokio::test]
async fn handlers_fire_in_registration_order_exactly_once() {
    let runtime = host_builder().build().expect("build failed");
    let log = Arc::new(Mutex::new(Vec::new()));

    runtime.on("locked".to_owned(), recorder("first", &log));
    runtime.on("locked".to_owned(), recorder("second", &log));

    runtime.dispatch_event(RuntimeEvent::new("locked", EventPayload::Empty));

    assert_eq!(*log.lock().unwrap(), vec!["first:locked", "second:locked"]);
}

#[tokio::test]
async fn off_without_an_id_removes_every_handler_for_the_event() {
    let runtime = host_builder().build().expect("build failed");
    let log = Arc::new(Mutex::new(Vec::new()));

    runtime.on("wiped".to_owned(), recorder("first", &log));
    runtime.on("wiped".to_owned(), recorder("second", &log));

    runtime.off("wiped".to_owned(), None);
    runtime.dispatch_event(RuntimeEvent::new("wiped", EventPayload::Empty));

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn off_with_an_id_removes_only_that_registration() {
    let runtime = host_builder().build().expect("build failed");
    let log = Arc::new(Mutex::new(Vec::new()));

    let first = runtime.on("update_config".to_owned(), recorder("first", &log));
    runtime.on("update_config".to_owned(), recorder("second", &log));

    runtime.off("update_config".to_owned(), Some(first));
    runtime.dispatch_event(RuntimeEvent::new("update_config", EventPayload::Empty));

    assert_eq!(*log.lock().unwrap(), vec!["second:update_config"]);
}

#[tokio::test]
async fn unknown_event_names_register_and_dispatch_silently() {
    let runtime = host_builder().build().expect("build failed");
    let log = Arc::new(Mutex::new(Vec::new()));

    runtime.on("introduced_in_a_future_sdk".to_owned(), recorder("h", &log));
    runtime.dispatch_event(RuntimeEvent::new("some_other_event", EventPayload::Empty));
    assert!(log.lock().unwrap().is_empty());

    runtime.dispatch_event(RuntimeEvent::new(
        "introduced_in_a_future_sdk",
        EventPayload::Message {
            text: "hello".to_owned(),
        },
    ));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["h:introduced_in_a_future_sdk"]
    );
}

#[tokio::test]
async fn payload_shapes_reach_handlers_intact() {
    let runtime = host_builder().build().expect("build failed");
    let seen = Arc::new(Mutex::new(Vec::new()));

    struct PayloadRecorder {
        seen: Arc<Mutex<Vec<EventPayload>>>,
    }

    impl EventHandler for PayloadRecorder {
        fn on_event(&self, event: RuntimeEvent) {
            self.seen.lock().unwrap().push(event.payload);
        }
    }

    runtime.on(
        "update_config".to_owned(),
        Box::new(PayloadRecorder { seen: seen.clone() }),
    );

    let entries = std::collections::HashMap::from([("policy".to_owned(), "strict".to_owned())]);
    runtime.dispatch_event(RuntimeEvent::new(
        "update_config",
        EventPayload::ConfigUpdate {
            entries: entries.clone(),
        },
    ));
    runtime.dispatch_event(RuntimeEvent::new(
        "update_config",
        EventPayload::Opaque {
            raw: vec![0xde, 0xad],
        },
    ));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], EventPayload::ConfigUpdate { entries });
    assert_eq!(
        seen[1],
        EventPayload::Opaque {
            raw: vec![0xde, 0xad]
        }
    );
}
