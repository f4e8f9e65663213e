//! pubsub-core: in-process publish/subscribe dispatch
//!
//! This crate provides:
//! - A subscription registry keyed by exact or prefix-wildcard patterns
//! - Synchronous, snapshot-safe dispatch in registration order
//! - Self-removing one-shot subscriptions
//! - Identity-based handler removal
//! - TOML-backed bus configuration

pub mod config;
pub mod error;
pub mod events;
pub mod id;

// Re-exports
pub use config::{BusConfig, ConfigError, FailurePolicy, KeyStrategy};
pub use error::{BusError, HandlerError, HandlerFailure, HandlerResult};
pub use events::{EventBus, EventPattern, EventReceiver, Handler, PatternKind};
pub use id::{KeyGen, SequentialKeyGen, SubscriptionKey, UuidKeyGen};
