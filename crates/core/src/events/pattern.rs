// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event pattern matching
//!
//! Two kinds of pattern:
//!   - Literal: "user.created" matches only "user.created"
//!   - Prefix wildcard: "user.*" matches any event starting with "user."
//!
//! A pattern made of the wildcard marker alone matches every event name.
//! Matching is case-sensitive and byte-exact.

use crate::error::BusError;
use std::fmt;

/// Default wildcard marker
pub const DEFAULT_WILDCARD: &str = "*";

/// How a pattern is matched against event names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Literal,
    Prefix,
}

/// A validated subscription pattern
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventPattern {
    raw: String,
    /// Byte length of the prefix; equals `raw.len()` for literals
    prefix_len: usize,
    wildcard: bool,
}

impl EventPattern {
    /// Parse a pattern using the default `*` marker
    pub fn new(pattern: &str) -> Result<Self, BusError> {
        Self::parse(pattern, DEFAULT_WILDCARD)
    }

    /// Parse a pattern, treating a trailing `marker` as a prefix wildcard
    pub fn parse(pattern: &str, marker: &str) -> Result<Self, BusError> {
        if pattern.is_empty() {
            return Err(BusError::InvalidPattern {
                pattern: String::new(),
                reason: "pattern must not be empty",
            });
        }

        let wildcard = !marker.is_empty() && pattern.ends_with(marker);
        let prefix_len = if wildcard {
            pattern.len() - marker.len()
        } else {
            pattern.len()
        };

        Ok(Self {
            raw: pattern.to_string(),
            prefix_len,
            wildcard,
        })
    }

    /// Check if this pattern matches an event name
    pub fn matches(&self, event_name: &str) -> bool {
        if self.wildcard {
            event_name.starts_with(self.prefix())
        } else {
            event_name == self.raw
        }
    }

    pub fn kind(&self) -> PatternKind {
        if self.wildcard {
            PatternKind::Prefix
        } else {
            PatternKind::Literal
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The literal text a matching event must start with
    pub fn prefix(&self) -> &str {
        &self.raw[..self.prefix_len]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
