// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph identifiers (`label.local`).
//!
//! A [`GraphId`] is a 16-bit label id plus a 48-bit local id, rendered as
//! `"label.local"`, or NULL. NULL follows SQL semantics: it is never equal to
//! anything, itself included, so `GraphId` implements `PartialEq` but not
//! `Eq`.
//!
//! Decoding parses into integers, so a `GraphId` never aliases the buffer it
//! was read from.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::config::IdRange;
use crate::error::{fragment, CodecError, IdComponent};

/// Token the wire format uses for a NULL array element or path.
pub const NULL_TOKEN: &str = "NULL";

/// Largest local id (48 bits).
pub const LOCAL_ID_MAX: u64 = (1 << 48) - 1;

/// Identifier of a vertex or an edge.
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphId {
    inner: Option<(u16, u64)>,
}

impl GraphId {
    /// The NULL identifier.
    pub const NULL: Self = Self { inner: None };

    /// Build an identifier from its components.
    ///
    /// # Errors
    ///
    /// [`CodecError::BadIdentifierRange`] if `local` exceeds 48 bits.
    pub fn new(label: u16, local: u64) -> Result<Self, CodecError> {
        if local > LOCAL_ID_MAX {
            return Err(CodecError::BadIdentifierRange {
                component: IdComponent::Local,
                text: local.to_string(),
                reason: "exceeds 48 bits",
            });
        }
        Ok(Self {
            inner: Some((label, local)),
        })
    }

    /// Parse `text` under the default (full) range policy.
    ///
    /// Accepts the `NULL` token, yielding [`GraphId::NULL`].
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        Self::parse_with(text, IdRange::default())
    }

    /// Parse `text` under the given range policy.
    ///
    /// # Errors
    ///
    /// [`CodecError::BadIdentifierFormat`] if `text` is neither `NULL` nor
    /// `digits "." digits`; [`CodecError::BadIdentifierRange`] if a component
    /// overflows its width or falls below the policy minimum.
    pub fn parse_with(text: &str, range: IdRange) -> Result<Self, CodecError> {
        if text == NULL_TOKEN {
            return Ok(Self::NULL);
        }
        Self::parse_value(text, range)
    }

    /// Decode a value handed over by the driver.
    ///
    /// `None` (the out-of-band "no value" marker) is NULL. Present bytes must
    /// hold a concrete id: an empty slice or the `NULL` token is an error.
    pub fn decode(src: Option<&[u8]>, range: IdRange) -> Result<Self, CodecError> {
        let Some(bytes) = src else {
            return Ok(Self::NULL);
        };
        let text = std::str::from_utf8(bytes).map_err(|_| CodecError::BadIdentifierFormat {
            text: fragment(bytes),
        })?;
        Self::parse_value(text, range)
    }

    /// Encode for parameter binding: NULL is the absent value.
    pub fn encode(&self) -> Option<Vec<u8>> {
        self.inner.map(|_| self.to_string().into_bytes())
    }

    /// Append the array-element form (`NULL` token for NULL).
    pub(crate) fn write_element(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.to_string().as_bytes());
    }

    /// Reports whether both ids are valid and identical.
    pub fn equal(&self, other: &Self) -> bool {
        match (self.inner, other.inner) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns `true` for the NULL identifier.
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns `true` for a concrete identifier.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// The 16-bit label component.
    pub fn label_id(&self) -> Option<u16> {
        self.inner.map(|(label, _)| label)
    }

    /// The 48-bit local component.
    pub fn local_id(&self) -> Option<u64> {
        self.inner.map(|(_, local)| local)
    }

    fn parse_value(text: &str, range: IdRange) -> Result<Self, CodecError> {
        let bad_format = || CodecError::BadIdentifierFormat {
            text: text.to_owned(),
        };
        let (label, local) = text.split_once('.').ok_or_else(bad_format)?;
        if !is_digits(label) || !is_digits(local) {
            return Err(bad_format());
        }

        let label = parse_component(label, IdComponent::Label, u64::from(u16::MAX), range)?;
        let local = parse_component(local, IdComponent::Local, LOCAL_ID_MAX, range)?;
        let label = u16::try_from(label).map_err(|_| CodecError::BadIdentifierRange {
            component: IdComponent::Label,
            text: label.to_string(),
            reason: "exceeds 16 bits",
        })?;
        Ok(Self {
            inner: Some((label, local)),
        })
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_component(
    text: &str,
    component: IdComponent,
    max: u64,
    range: IdRange,
) -> Result<u64, CodecError> {
    let reason = match component {
        IdComponent::Label => "exceeds 16 bits",
        IdComponent::Local => "exceeds 48 bits",
    };
    let out_of_range = |reason| CodecError::BadIdentifierRange {
        component,
        text: text.to_owned(),
        reason,
    };
    let value: u64 = text.parse().map_err(|_| out_of_range(reason))?;
    if value > max {
        return Err(out_of_range(reason));
    }
    if value < range.min() {
        return Err(out_of_range("is below the permitted minimum"));
    }
    Ok(value)
}

impl PartialEq for GraphId {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some((label, local)) => write!(f, "{label}.{local}"),
            None => f.write_str(NULL_TOKEN),
        }
    }
}

impl FromStr for GraphId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GraphId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_valid() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for GraphId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => Self::parse(&text).map_err(de::Error::custom),
            None => Ok(Self::NULL),
        }
    }
}
