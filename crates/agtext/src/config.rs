// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Codec configuration (range and payload policies).
//!
//! Two behaviours of the wire format have differed between server revisions,
//! so they are policy flags rather than hidden constants:
//!
//! - whether `0` is a legal graph id component ([`IdRange`]);
//! - whether an entity without a property object is an error or an implicit
//!   `{}` ([`EmptyProperties`]).
//!
//! Configs are plain serde documents; missing fields take their defaults so a
//! partial JSON file is accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound policy for graph id components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdRange {
    /// Accept every value that fits the bit width, including `0.0`.
    #[default]
    Full,
    /// Reject zero in either component (`1.1` is the smallest id).
    NonZero,
}

impl IdRange {
    /// Smallest accepted component value under this policy.
    pub fn min(self) -> u64 {
        match self {
            Self::Full => 0,
            Self::NonZero => 1,
        }
    }
}

/// Policy for an entity header that is not followed by a property object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyProperties {
    /// A missing property object is a `MalformedObject` error.
    #[default]
    Reject,
    /// A missing property object reads as `{}`.
    ImplicitEmpty,
}

/// Settings carried through every decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Graph id range policy.
    pub id_range: IdRange,
    /// Missing property payload policy.
    pub empty_properties: EmptyProperties,
}

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Serialization/deserialization failure.
    #[error("invalid codec config: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CodecConfig {
    /// Deserialize a config from a JSON document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize this config as pretty-printed JSON.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Returns a copy with the given id range policy.
    pub fn with_id_range(mut self, id_range: IdRange) -> Self {
        self.id_range = id_range;
        self
    }

    /// Returns a copy with the given empty-properties policy.
    pub fn with_empty_properties(mut self, empty_properties: EmptyProperties) -> Self {
        self.empty_properties = empty_properties;
        self
    }
}
