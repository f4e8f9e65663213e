//! Publish specs
//!
//! Literal and wildcard routing, ordering, and returned keys.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn publish_without_subscribers_changes_nothing() {
    let bus = bus();
    let journal = Journal::new();
    bus.subscribe("other", journal.handler("a")).unwrap();

    assert_eq!(bus.publish("x", &1).unwrap(), Vec::<SubscriptionKey>::new());
    assert_eq!(bus.count(), 1);
    assert!(journal.entries().is_empty());
}

#[test]
fn wildcard_routes_by_prefix() {
    let bus = bus();
    let journal = Journal::new();
    let key = bus.subscribe("user.*", journal.handler("users")).unwrap();

    assert_eq!(bus.publish("user.created", &1).unwrap(), vec![key]);
    assert!(bus.publish("order.created", &2).unwrap().is_empty());
    assert_eq!(journal.entries(), vec!["users:1"]);
}

#[test]
fn literal_and_wildcard_scenario() {
    let bus = bus();
    let journal = Journal::new();
    let h1 = bus.subscribe("a", journal.handler("h1")).unwrap();
    let h2 = bus.subscribe("a.*", journal.handler("h2")).unwrap();
    bus.subscribe("b", journal.handler("h3")).unwrap();

    assert_eq!(bus.publish("a.b", &42).unwrap(), vec![h2]);
    assert_eq!(journal.entries(), vec!["h2:42"]);

    assert_eq!(bus.publish("a", &42).unwrap(), vec![h1]);
    assert_eq!(journal.entries(), vec!["h2:42", "h1:42"]);
}

#[test]
fn matching_is_case_sensitive() {
    let bus = bus();
    let journal = Journal::new();
    bus.subscribe("User.*", journal.handler("a")).unwrap();

    assert!(bus.publish("user.created", &1).unwrap().is_empty());
}

#[test]
fn bare_wildcard_sees_everything() {
    let bus = bus();
    let journal = Journal::new();
    bus.subscribe("*", journal.handler("all")).unwrap();

    for event in ["a", "b.c", "anything.at.all"] {
        assert_eq!(bus.publish(event, &0).unwrap().len(), 1);
    }
    assert_eq!(journal.calls("all"), 3);
}

#[test]
fn keys_concatenate_in_pattern_match_order() {
    let bus = bus();
    let journal = Journal::new();
    let all = bus.subscribe("*", journal.handler("all")).unwrap();
    let orders = bus.subscribe("order.*", journal.handler("orders")).unwrap();
    let exact1 = bus.subscribe("order.paid", journal.handler("exact1")).unwrap();
    let exact2 = bus.subscribe("order.paid", journal.handler("exact2")).unwrap();
    let orders2 = bus.subscribe("order.*", journal.handler("orders2")).unwrap();

    let invoked = bus.publish("order.paid", &9).unwrap();

    assert_eq!(invoked, vec![exact1, exact2, all, orders, orders2]);
    assert_eq!(
        journal.entries(),
        vec!["exact1:9", "exact2:9", "all:9", "orders:9", "orders2:9"]
    );

    // Same order every time
    assert_eq!(bus.publish("order.paid", &9).unwrap(), invoked);
}

#[test]
fn custom_marker_from_config() {
    let bus = bus_with(BusConfig::default().with_wildcard("**"));
    let journal = Journal::new();
    bus.subscribe("jobs.**", journal.handler("jobs")).unwrap();
    bus.subscribe("jobs.*", journal.handler("literal")).unwrap();

    bus.publish("jobs.done", &1).unwrap();
    bus.publish("jobs.*", &2).unwrap();

    assert_eq!(journal.entries(), vec!["jobs:1", "literal:2", "jobs:2"]);
}
