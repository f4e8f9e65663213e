// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription registry
//!
//! Subscriptions are partitioned into one slot per pattern. Each slot keeps
//! its subscriptions in insertion order; a reverse index maps every live key
//! to its slot so removal by key never scans. Slots are created on first use
//! and dropped as soon as they become empty; a pattern keeps the position of
//! its first registration until the registry is cleared.

use super::handler::Handler;
use super::once::OnceWrapper;
use super::pattern::EventPattern;
use crate::error::BusError;
use crate::id::{KeyGen, SubscriptionKey};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A live registration
pub(crate) struct Subscription<P> {
    pub key: SubscriptionKey,
    pub handler: Handler<P>,
    pub once: Option<Arc<OnceWrapper<P>>>,
}

impl<P> Clone for Subscription<P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            handler: self.handler.clone(),
            once: self.once.clone(),
        }
    }
}

/// Subscriptions of one matching pattern, copied out of the registry
pub(crate) struct Snapshot<P> {
    pub pattern: String,
    pub subscriptions: Vec<Subscription<P>>,
}

struct Slot<P> {
    pattern: EventPattern,
    ordinal: u64,
    entries: BTreeMap<u64, Subscription<P>>,
}

/// Location of a key: slot name and sequence within the slot
type IndexEntry = (String, u64);

/// Draws allowed per registration before the key generator is deemed stuck
pub(crate) const MAX_KEY_DRAWS: usize = 64;

pub(crate) struct Registry<P> {
    key_gen: Arc<dyn KeyGen>,
    slots: HashMap<String, Slot<P>>,
    /// All slot names by creation ordinal
    order: BTreeMap<u64, String>,
    /// Wildcard slot names by creation ordinal
    wildcards: BTreeMap<u64, String>,
    /// Ordinal of each pattern's first registration, kept while its slot is empty
    first_seen: HashMap<String, u64>,
    index: HashMap<SubscriptionKey, IndexEntry>,
    next_seq: u64,
}

impl<P> Registry<P> {
    pub fn new(key_gen: Arc<dyn KeyGen>) -> Self {
        Self {
            key_gen,
            slots: HashMap::new(),
            order: BTreeMap::new(),
            wildcards: BTreeMap::new(),
            first_seen: HashMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Store a subscription and return its fresh key
    ///
    /// A once-wrapper has its key bound before the write lock is released,
    /// so no dispatch can observe it unbound.
    pub fn insert(
        &mut self,
        pattern: EventPattern,
        handler: Handler<P>,
        once: Option<Arc<OnceWrapper<P>>>,
    ) -> Result<SubscriptionKey, BusError> {
        let key = self.fresh_key()?;
        if let Some(wrapper) = &once {
            wrapper.bind(key.clone());
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let name = pattern.as_str().to_string();
        let slot = match self.slots.entry(name.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let ordinal = *self.first_seen.entry(name.clone()).or_insert(seq);
                self.order.insert(ordinal, name.clone());
                if pattern.is_wildcard() {
                    self.wildcards.insert(ordinal, name.clone());
                }
                e.insert(Slot {
                    pattern,
                    ordinal,
                    entries: BTreeMap::new(),
                })
            }
        };

        slot.entries.insert(
            seq,
            Subscription {
                key: key.clone(),
                handler,
                once,
            },
        );
        self.index.insert(key.clone(), (name, seq));
        Ok(key)
    }

    fn fresh_key(&self) -> Result<SubscriptionKey, BusError> {
        for _ in 0..MAX_KEY_DRAWS {
            let key = self.key_gen.next_key();
            if !self.index.contains_key(&key) {
                return Ok(key);
            }
        }
        Err(BusError::KeysExhausted {
            attempts: MAX_KEY_DRAWS,
        })
    }

    /// Remove one subscription by key
    pub fn remove(&mut self, key: &SubscriptionKey) -> Option<Subscription<P>> {
        let (name, seq) = self.index.remove(key)?;
        let slot = self.slots.get_mut(&name)?;
        let removed = slot.entries.remove(&seq);
        if slot.entries.is_empty() {
            self.drop_slot(&name);
        }
        removed
    }

    /// Remove every subscription whose handler is `handler`
    ///
    /// Keys are returned slot by slot in creation order, and in insertion
    /// order within each slot.
    pub fn remove_handler(&mut self, handler: &Handler<P>) -> Vec<SubscriptionKey> {
        let matched: Vec<SubscriptionKey> = self
            .order
            .values()
            .filter_map(|name| self.slots.get(name))
            .flat_map(|slot| slot.entries.values())
            .filter(|sub| sub.handler.same(handler))
            .map(|sub| sub.key.clone())
            .collect();

        for key in &matched {
            self.remove(key);
        }
        matched
    }

    /// Remove one pattern's subscriptions, returning how many were removed
    pub fn clear_pattern(&mut self, pattern: &str) -> usize {
        let Some(slot) = self.drop_slot(pattern) else {
            return 0;
        };
        for sub in slot.entries.values() {
            self.index.remove(&sub.key);
        }
        slot.entries.len()
    }

    /// Remove everything, returning how many subscriptions were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.index.len();
        self.slots.clear();
        self.order.clear();
        self.wildcards.clear();
        self.first_seen.clear();
        self.index.clear();
        removed
    }

    fn drop_slot(&mut self, name: &str) -> Option<Slot<P>> {
        let slot = self.slots.remove(name)?;
        self.order.remove(&slot.ordinal);
        self.wildcards.remove(&slot.ordinal);
        Some(slot)
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn count_pattern(&self, pattern: &str) -> usize {
        self.slots.get(pattern).map_or(0, |slot| slot.entries.len())
    }

    pub fn contains(&self, key: &SubscriptionKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn pattern_of(&self, key: &SubscriptionKey) -> Option<&str> {
        self.index.get(key).map(|(name, _)| name.as_str())
    }

    pub fn is_once(&self, key: &SubscriptionKey) -> bool {
        self.index
            .get(key)
            .and_then(|(name, seq)| self.slots.get(name)?.entries.get(seq))
            .is_some_and(|sub| sub.once.is_some())
    }

    /// Live patterns in slot creation order
    pub fn patterns(&self) -> Vec<String> {
        self.order.values().cloned().collect()
    }

    /// Copy the subscriptions of every pattern matching `event`
    ///
    /// The literal slot equal to `event` comes first, then matching wildcard
    /// slots in creation order.
    pub fn snapshot(&self, event: &str) -> Vec<Snapshot<P>> {
        let literal = self
            .slots
            .get(event)
            .filter(|slot| !slot.pattern.is_wildcard());

        let wildcards = self
            .wildcards
            .values()
            .filter_map(|name| self.slots.get(name))
            .filter(|slot| slot.pattern.matches(event));

        literal
            .into_iter()
            .chain(wildcards)
            .map(|slot| Snapshot {
                pattern: slot.pattern.as_str().to_string(),
                subscriptions: slot.entries.values().cloned().collect(),
            })
            .collect()
    }

    /// Verify the forward collections and the reverse index agree
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let forward: usize = self.slots.values().map(|slot| slot.entries.len()).sum();
        assert_eq!(forward, self.index.len(), "index size mismatch");
        assert_eq!(self.slots.len(), self.order.len(), "order size mismatch");

        for (name, slot) in &self.slots {
            assert!(!slot.entries.is_empty(), "empty slot '{}' retained", name);
            assert_eq!(self.order.get(&slot.ordinal), Some(name));
            assert_eq!(self.first_seen.get(name), Some(&slot.ordinal));
            assert_eq!(
                self.wildcards.contains_key(&slot.ordinal),
                slot.pattern.is_wildcard()
            );
            for (seq, sub) in &slot.entries {
                assert_eq!(self.index.get(&sub.key), Some(&(name.clone(), *seq)));
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
