// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events system for loose coupling between components
//!
//! This module provides:
//! - `EventBus` - Register handlers and dispatch events to them synchronously
//! - `EventPattern` - Literal and prefix-wildcard matching of event names
//! - `Handler` - Invocable handler with identity semantics for removal

mod bus;
mod handler;
mod once;
mod pattern;
mod registry;

pub use bus::{EventBus, EventReceiver};
pub use handler::Handler;
pub use pattern::{EventPattern, PatternKind, DEFAULT_WILDCARD};
