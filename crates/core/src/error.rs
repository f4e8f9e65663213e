// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for registration and dispatch

use crate::id::SubscriptionKey;
use thiserror::Error;

/// Error returned by a handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result returned by a handler
pub type HandlerResult = Result<(), HandlerError>;

/// A single handler failure recorded during dispatch
#[derive(Debug, Error)]
#[error("handler {key} for pattern '{pattern}' failed: {source}")]
pub struct HandlerFailure {
    pub key: SubscriptionKey,
    pub pattern: String,
    #[source]
    pub source: HandlerError,
}

/// Errors surfaced by the event bus
///
/// Unknown keys and events without subscribers are not errors; those
/// operations report `false` or an empty key list instead.
#[derive(Debug, Error)]
pub enum BusError {
    /// Pattern rejected at registration time
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    /// A handler failed and the remaining handlers were skipped
    #[error("handler {key} for pattern '{pattern}' failed: {source}")]
    Handler {
        key: SubscriptionKey,
        pattern: String,
        #[source]
        source: HandlerError,
    },

    /// One or more handlers failed; every other handler still ran
    #[error("{} of {} handlers failed during dispatch", .failures.len(), .invoked.len())]
    Dispatch {
        invoked: Vec<SubscriptionKey>,
        failures: Vec<HandlerFailure>,
    },

    /// The key generator kept returning keys that are already live
    #[error("no unused subscription key after {attempts} draws")]
    KeysExhausted { attempts: usize },
}

impl From<HandlerFailure> for BusError {
    fn from(failure: HandlerFailure) -> Self {
        BusError::Handler {
            key: failure.key,
            pattern: failure.pattern,
            source: failure.source,
        }
    }
}
