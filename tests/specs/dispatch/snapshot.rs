//! Snapshot specs
//!
//! Handlers may mutate the bus mid-dispatch; the running publish call keeps
//! the set of subscribers it started with.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::sync::{Arc, Mutex};

#[test]
fn subscriber_added_during_publish_runs_next_time() {
    let bus = bus();
    let journal = Journal::new();
    let added = Arc::new(Mutex::new(false));

    let inner = bus.clone();
    let late = journal.handler("h2");
    let flag = Arc::clone(&added);
    bus.subscribe(
        "x",
        Handler::from_fn(move |_: &Payload| {
            let mut added = flag.lock().unwrap();
            if !*added {
                inner.subscribe("x", late.clone()).unwrap();
                *added = true;
            }
        }),
    )
    .unwrap();

    assert_eq!(bus.publish("x", &1).unwrap().len(), 1);
    assert_eq!(journal.calls("h2"), 0);

    assert_eq!(bus.publish("x", &2).unwrap().len(), 2);
    assert_eq!(journal.entries(), vec!["h2:2"]);
}

#[test]
fn subscriber_removed_during_publish_still_runs_once() {
    let bus = bus();
    let journal = Journal::new();
    let victim = journal.handler("victim");

    let inner = bus.clone();
    let target = victim.clone();
    bus.subscribe(
        "x",
        Handler::from_fn(move |_: &Payload| {
            inner.unsubscribe(&target);
        }),
    )
    .unwrap();
    bus.subscribe("x", victim).unwrap();

    assert_eq!(bus.publish("x", &1).unwrap().len(), 2);
    assert_eq!(bus.publish("x", &2).unwrap().len(), 1);
    assert_eq!(journal.entries(), vec!["victim:1"]);
}

#[test]
fn handler_may_publish_recursively() {
    let bus = bus();
    let journal = Journal::new();

    let inner = bus.clone();
    bus.subscribe(
        "ping",
        Handler::from_fn(move |n: &Payload| {
            if *n > 0 {
                inner.publish("ping", &(n - 1)).unwrap();
            }
        }),
    )
    .unwrap();
    bus.subscribe("ping", journal.handler("seen")).unwrap();

    bus.publish("ping", &2).unwrap();

    // Depth-first: innermost publish completes before outer handlers resume
    assert_eq!(journal.entries(), vec!["seen:0", "seen:1", "seen:2"]);
}
