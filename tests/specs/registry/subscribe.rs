//! Subscription registration specs
//!
//! Keys are fresh, unique, never reused; counts track live subscriptions.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn subscribe_returns_live_key_and_counts_it() {
    let bus = bus();
    let journal = Journal::new();

    for (i, pattern) in ["x", "x", "y.*", "*"].iter().enumerate() {
        let before = bus.count_pattern(pattern);
        let key = bus.subscribe(pattern, journal.handler("h")).unwrap();

        assert!(bus.key_exists(&key));
        assert_eq!(bus.count_pattern(pattern), before + 1);
        assert_eq!(bus.count(), i + 1);
    }
}

#[test]
fn keys_are_never_reused() {
    let bus = bus();
    let journal = Journal::new();

    let first = bus.subscribe("x", journal.handler("a")).unwrap();
    assert!(bus.unsubscribe_by_key(&first));
    bus.clear();
    let second = bus.subscribe("x", journal.handler("a")).unwrap();

    assert_eq!(first, key("k-1"));
    assert_eq!(second, key("k-2"));
}

#[test]
fn clones_continue_the_key_sequence() {
    let bus = bus();
    let journal = Journal::new();

    let first = bus.subscribe("x", journal.handler("a")).unwrap();
    assert!(bus.unsubscribe_by_key(&first));

    let clone = bus.clone();
    let second = clone.subscribe("x", journal.handler("a")).unwrap();
    let third = bus.subscribe("x", journal.handler("a")).unwrap();

    assert_eq!(first, key("k-1"));
    assert_eq!(second, key("k-2"));
    assert_eq!(third, key("k-3"));
}

#[test]
fn reregistered_pattern_keeps_its_place() {
    let bus = bus();
    let journal = Journal::new();

    let first = bus.subscribe("a.*", journal.handler("wide")).unwrap();
    bus.subscribe("a.b*", journal.handler("narrow")).unwrap();
    assert!(bus.unsubscribe_by_key(&first));
    bus.subscribe("a.*", journal.handler("wide")).unwrap();

    bus.publish("a.bc", &1).unwrap();
    assert_eq!(journal.entries(), vec!["wide:1", "narrow:1"]);
    assert_eq!(bus.patterns(), vec!["a.*", "a.b*"]);
}

#[test]
fn empty_pattern_is_invalid() {
    let bus = bus();
    let journal = Journal::new();

    let err = bus.subscribe("", journal.handler("a")).unwrap_err();
    assert!(matches!(err, BusError::InvalidPattern { .. }));
    assert_eq!(bus.count(), 0);
}

#[test]
fn unknown_pattern_counts_zero() {
    let bus = bus();
    assert_eq!(bus.count_pattern("nothing"), 0);
    assert_eq!(bus.count(), 0);
    assert!(!bus.key_exists(&key("k-1")));
}

#[test]
fn introspection_reports_pattern_and_kind() {
    let bus = bus();
    let journal = Journal::new();

    let plain = bus.subscribe("orders.*", journal.handler("a")).unwrap();
    let once = bus.once("orders.*", journal.handler("b")).unwrap();

    assert_eq!(bus.pattern_of(&plain), Some("orders.*".to_string()));
    assert!(!bus.is_once(&plain));
    assert!(bus.is_once(&once));
    assert_eq!(bus.patterns(), vec!["orders.*".to_string()]);
}
