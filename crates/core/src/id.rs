// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription key generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque handle identifying one subscription on one bus
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionKey(pub String);

impl SubscriptionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Issues subscription keys
///
/// Implementations must never repeat a key over their lifetime; a bus keeps
/// one generator from construction onward. The registry calls this while
/// holding its write lock and re-draws a bounded number of times on a
/// collision with a live key.
pub trait KeyGen: Send + Sync {
    fn next_key(&self) -> SubscriptionKey;
}

/// UUID-based key generator for production use
#[derive(Clone, Debug, Default)]
pub struct UuidKeyGen;

impl KeyGen for UuidKeyGen {
    fn next_key(&self) -> SubscriptionKey {
        SubscriptionKey(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential key generator, never repeats for the lifetime of the counter
///
/// Clones share the counter.
#[derive(Clone, Debug)]
pub struct SequentialKeyGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialKeyGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialKeyGen {
    fn default() -> Self {
        Self::new("sub")
    }
}

impl KeyGen for SequentialKeyGen {
    fn next_key(&self) -> SubscriptionKey {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        SubscriptionKey(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
