// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-removing subscriptions
//!
//! A once-subscription carries an [`OnceWrapper`] next to its handler. The
//! wrapper learns its own key during registration and removes that key from
//! the registry after the first invocation, whether the handler succeeded,
//! failed, or panicked.

use super::registry::Registry;
use crate::id::SubscriptionKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock, Weak};

pub(crate) struct OnceWrapper<P> {
    key: OnceLock<SubscriptionKey>,
    fired: AtomicBool,
    registry: Weak<RwLock<Registry<P>>>,
}

impl<P> OnceWrapper<P> {
    pub fn new(registry: Weak<RwLock<Registry<P>>>) -> Self {
        Self {
            key: OnceLock::new(),
            fired: AtomicBool::new(false),
            registry,
        }
    }

    /// Bind the key issued at registration. Later binds are ignored.
    pub fn bind(&self, key: SubscriptionKey) {
        let _ = self.key.set(key);
    }

    #[cfg(test)]
    pub fn key(&self) -> Option<&SubscriptionKey> {
        self.key.get()
    }

    #[cfg(test)]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Claim the single invocation
    ///
    /// Returns `None` if an earlier dispatch already claimed it. The returned
    /// guard removes the subscription when dropped.
    pub fn fire(self: &Arc<Self>) -> Option<Firing<P>> {
        if self.fired.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(Firing {
            wrapper: Arc::clone(self),
        })
    }

    fn remove_self(&self) {
        let Some(key) = self.key.get() else {
            return;
        };
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = registry
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
            .is_some();
        tracing::debug!(%key, removed, "once subscription retired");
    }
}

/// Guard held while a once-handler runs
pub(crate) struct Firing<P> {
    wrapper: Arc<OnceWrapper<P>>,
}

impl<P> Drop for Firing<P> {
    fn drop(&mut self) {
        self.wrapper.remove_self();
    }
}

#[cfg(test)]
#[path = "once_tests.rs"]
mod tests;
