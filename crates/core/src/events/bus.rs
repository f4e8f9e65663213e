// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus: registration and synchronous dispatch

use super::handler::Handler;
use super::once::OnceWrapper;
use super::pattern::EventPattern;
use super::registry::Registry;
use crate::config::{BusConfig, FailurePolicy};
use crate::error::{BusError, HandlerFailure};
use crate::id::{KeyGen, SubscriptionKey};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

/// Receiver half of a channel subscription
pub type EventReceiver<P> = mpsc::UnboundedReceiver<P>;

/// In-process publish/subscribe bus
///
/// Handlers run synchronously on the publishing thread, in registration
/// order. `publish` copies the matching subscriptions under the registry lock
/// and releases the lock before calling any handler, so handlers may
/// subscribe, unsubscribe, or publish on the same bus.
///
/// Clones share the same registry.
///
/// # Example
///
/// ```
/// use pubsub_core::{EventBus, Handler};
///
/// let bus: EventBus<u32> = EventBus::new();
/// let key = bus.subscribe("user.*", Handler::from_fn(|n: &u32| assert_eq!(*n, 42))).unwrap();
///
/// assert_eq!(bus.publish("user.created", &42).unwrap(), vec![key]);
/// assert!(bus.publish("order.created", &42).unwrap().is_empty());
/// ```
pub struct EventBus<P> {
    registry: Arc<RwLock<Registry<P>>>,
    config: Arc<BusConfig>,
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        let key_gen = config.keys.key_gen();
        Self::from_parts(config, key_gen)
    }

    /// Default configuration with a caller-supplied key generator
    pub fn with_key_gen(key_gen: impl KeyGen + 'static) -> Self {
        Self::with_config_and_key_gen(BusConfig::default(), key_gen)
    }

    /// Use `key_gen` instead of the generator named by `config.keys`
    ///
    /// The generator is fixed for the bus lifetime, so a sequence can never
    /// be restarted under a registry that has already issued keys.
    pub fn with_config_and_key_gen(config: BusConfig, key_gen: impl KeyGen + 'static) -> Self {
        Self::from_parts(config, Arc::new(key_gen))
    }

    fn from_parts(config: BusConfig, key_gen: Arc<dyn KeyGen>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new(key_gen))),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry<P>> {
        self.registry.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry<P>> {
        self.registry.write().unwrap_or_else(|e| e.into_inner())
    }

    fn parse(&self, pattern: &str) -> Result<EventPattern, BusError> {
        EventPattern::parse(pattern, &self.config.wildcard)
    }

    /// Register a persistent subscription
    pub fn subscribe(&self, pattern: &str, handler: Handler<P>) -> Result<SubscriptionKey, BusError> {
        let parsed = self.parse(pattern)?;
        let key = self.write().insert(parsed, handler, None)?;
        tracing::debug!(%key, pattern, "subscribed");
        Ok(key)
    }

    /// Register an infallible closure, returning the handler for later removal
    pub fn subscribe_fn<F>(
        &self,
        pattern: &str,
        f: F,
    ) -> Result<(SubscriptionKey, Handler<P>), BusError>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let handler = Handler::from_fn(f);
        let key = self.subscribe(pattern, handler.clone())?;
        Ok((key, handler))
    }

    /// Register a subscription that removes itself after its first invocation
    pub fn once(&self, pattern: &str, handler: Handler<P>) -> Result<SubscriptionKey, BusError> {
        let parsed = self.parse(pattern)?;
        let wrapper = Arc::new(OnceWrapper::new(Arc::downgrade(&self.registry)));
        let key = self.write().insert(parsed, handler, Some(wrapper))?;
        tracing::debug!(%key, pattern, "subscribed once");
        Ok(key)
    }

    pub fn once_fn<F>(&self, pattern: &str, f: F) -> Result<(SubscriptionKey, Handler<P>), BusError>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let handler = Handler::from_fn(f);
        let key = self.once(pattern, handler.clone())?;
        Ok((key, handler))
    }

    /// Dispatch `payload` to every subscription matching `event`
    ///
    /// Returns the keys whose handlers ran, literal pattern first, then
    /// wildcard patterns in the order they were created. Subscriptions added
    /// while dispatching are not invoked by this call; subscriptions removed
    /// while dispatching still run if they were live when it began.
    ///
    /// A failing handler is handled per [`FailurePolicy`]. Once-subscriptions
    /// are retired before any error reaches the caller.
    pub fn publish(&self, event: &str, payload: &P) -> Result<Vec<SubscriptionKey>, BusError> {
        let span = tracing::debug_span!("publish", event);
        let _enter = span.enter();

        let snapshots = self.read().snapshot(event);

        let mut invoked = Vec::new();
        let mut failures = Vec::new();

        for snapshot in snapshots {
            for sub in snapshot.subscriptions {
                let _firing = match &sub.once {
                    Some(wrapper) => match wrapper.fire() {
                        Some(firing) => Some(firing),
                        // Claimed by an earlier or concurrent dispatch
                        None => continue,
                    },
                    None => None,
                };

                tracing::trace!(key = %sub.key, pattern = %snapshot.pattern, "invoking handler");
                invoked.push(sub.key.clone());

                let Err(source) = sub.handler.call(payload) else {
                    continue;
                };
                let failure = HandlerFailure {
                    key: sub.key,
                    pattern: snapshot.pattern.clone(),
                    source,
                };
                match self.config.failure_policy {
                    FailurePolicy::FailFast => return Err(failure.into()),
                    FailurePolicy::Isolate => {
                        tracing::warn!(key = %failure.key, error = %failure.source, "handler failed");
                        failures.push(failure);
                    }
                }
            }
        }

        tracing::trace!(invoked = invoked.len(), failed = failures.len(), "dispatch complete");

        if failures.is_empty() {
            Ok(invoked)
        } else {
            Err(BusError::Dispatch { invoked, failures })
        }
    }

    /// Remove a subscription by key; `false` if it was not live
    pub fn unsubscribe_by_key(&self, key: &SubscriptionKey) -> bool {
        let removed = self.write().remove(key).is_some();
        if removed {
            tracing::debug!(%key, "unsubscribed");
        }
        removed
    }

    /// Remove every subscription registered with `handler`, on any pattern
    pub fn unsubscribe(&self, handler: &Handler<P>) -> Vec<SubscriptionKey> {
        let removed = self.write().remove_handler(handler);
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "unsubscribed handler");
        }
        removed
    }

    /// Remove all subscriptions
    pub fn clear(&self) {
        let removed = self.write().clear();
        tracing::debug!(removed, "cleared all subscriptions");
    }

    /// Remove the subscriptions registered under exactly `pattern`
    pub fn clear_pattern(&self, pattern: &str) {
        let removed = self.write().clear_pattern(pattern);
        tracing::debug!(pattern, removed, "cleared pattern");
    }

    /// Total live subscriptions
    pub fn count(&self) -> usize {
        self.read().count()
    }

    /// Live subscriptions registered under exactly `pattern`
    pub fn count_pattern(&self, pattern: &str) -> usize {
        self.read().count_pattern(pattern)
    }

    pub fn key_exists(&self, key: &SubscriptionKey) -> bool {
        self.read().contains(key)
    }

    /// The pattern a live key was registered under
    pub fn pattern_of(&self, key: &SubscriptionKey) -> Option<String> {
        self.read().pattern_of(key).map(str::to_string)
    }

    /// Whether a live key belongs to a once-subscription
    pub fn is_once(&self, key: &SubscriptionKey) -> bool {
        self.read().is_once(key)
    }

    /// Patterns with at least one live subscription, oldest first
    pub fn patterns(&self) -> Vec<String> {
        self.read().patterns()
    }
}

impl<P> EventBus<P>
where
    P: Clone + Send + 'static,
{
    /// Forward matching payloads into an unbounded channel
    ///
    /// Sends never block. Once the receiver is dropped, payloads are
    /// discarded until the subscription is removed by key.
    pub fn channel(&self, pattern: &str) -> Result<(SubscriptionKey, EventReceiver<P>), BusError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = Handler::from_fn(move |payload: &P| {
            let _ = tx.send(payload.clone());
        });
        let key = self.subscribe(pattern, handler)?;
        Ok((key, rx))
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
