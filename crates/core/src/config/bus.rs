// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration
//!
//! Loaded from TOML; every field is optional:
//!
//! ```toml
//! wildcard = "*"
//! failure-policy = "isolate"
//!
//! [keys]
//! strategy = "sequential"
//! prefix = "sub"
//! ```

use crate::events::DEFAULT_WILDCARD;
use crate::id::{KeyGen, SequentialKeyGen, UuidKeyGen};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error reading file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Field parsed but rejected
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// What `publish` does when a handler returns an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it
    #[default]
    FailFast,
    /// Run every handler, then report all failures together
    Isolate,
}

/// How subscription keys are generated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum KeyStrategy {
    /// Random v4 UUIDs
    #[default]
    Uuid,
    /// `<prefix>-1`, `<prefix>-2`, ...
    Sequential {
        #[serde(default = "default_prefix")]
        prefix: String,
    },
}

fn default_prefix() -> String {
    "sub".to_string()
}

impl KeyStrategy {
    pub fn key_gen(&self) -> Arc<dyn KeyGen> {
        match self {
            KeyStrategy::Uuid => Arc::new(UuidKeyGen),
            KeyStrategy::Sequential { prefix } => Arc::new(SequentialKeyGen::new(prefix.clone())),
        }
    }
}

/// Bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BusConfig {
    /// Trailing marker that turns a pattern into a prefix wildcard
    pub wildcard: String,
    pub failure_policy: FailurePolicy,
    pub keys: KeyStrategy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            wildcard: DEFAULT_WILDCARD.to_string(),
            failure_policy: FailurePolicy::default(),
            keys: KeyStrategy::default(),
        }
    }
}

impl BusConfig {
    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_keys(mut self, keys: KeyStrategy) -> Self {
        self.keys = keys;
        self
    }

    /// Parse and validate configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BusConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wildcard.is_empty() {
            return Err(ConfigError::Invalid {
                field: "wildcard",
                reason: "marker must not be empty",
            });
        }
        if let KeyStrategy::Sequential { prefix } = &self.keys {
            if prefix.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "keys.prefix",
                    reason: "prefix must not be empty",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
