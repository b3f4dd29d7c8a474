// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error model shared by every decoder and encoder in the crate.
//!
//! Lower layers never swallow errors: a failure inside an identifier, an
//! entity header, or a property payload is wrapped with the context of the
//! layer that observed it (`invalid edge start ID: ...`) and propagated
//! unchanged to the caller. [`CodecError::kind`] collapses the variants onto
//! the small set of conditions callers usually branch on.

use std::fmt;

use thiserror::Error;

/// Longest input fragment (in bytes) quoted inside an error message.
const FRAGMENT_LIMIT: usize = 64;

/// Renders the offending input for an error message (lossy UTF-8, truncated).
pub(crate) fn fragment(bytes: &[u8]) -> String {
    let end = bytes.len().min(FRAGMENT_LIMIT);
    let mut out = String::from_utf8_lossy(&bytes[..end]).into_owned();
    if bytes.len() > FRAGMENT_LIMIT {
        out.push_str("...");
    }
    out
}

/// Which half of a graph id failed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdComponent {
    /// The 16-bit label half (before the dot).
    Label,
    /// The 48-bit local half (after the dot).
    Local,
}

impl fmt::Display for IdComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => f.write_str("label ID"),
            Self::Local => f.write_str("local ID"),
        }
    }
}

/// Identifier slot of an entity header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityField {
    /// The entity's own id.
    Id,
    /// Edge start vertex id.
    Start,
    /// Edge end vertex id.
    End,
}

impl fmt::Display for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("ID"),
            Self::Start => f.write_str("start ID"),
            Self::End => f.write_str("end ID"),
        }
    }
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier text does not match `digits "." digits`.
    BadIdentifierFormat,
    /// Identifier component overflows its bit width or violates the range policy.
    BadIdentifierRange,
    /// Entity header grammar mismatch or an invalid header field.
    BadEntityRepresentation,
    /// Array delimiters, separators, or an element are invalid.
    BadSequenceRepresentation,
    /// Path brackets, alternation, or an element are invalid.
    BadPathRepresentation,
    /// Property payload is not a balanced `{...}` object.
    MalformedObject,
    /// Property payload could not be decoded into (or encoded from) the host's fields.
    InvalidProperties,
    /// The collaborator handed over a value kind this decoder cannot read.
    UnsupportedSourceType,
    /// The host record rejected the decoded value.
    HostCapabilityMismatch,
}

/// Errors produced while decoding or encoding wire text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Identifier text does not match the `label.local` pattern.
    #[error("bad graphid representation: {text:?}")]
    BadIdentifierFormat {
        /// Offending text.
        text: String,
    },
    /// Identifier component is outside the permitted range.
    #[error("invalid {component}: {text:?} {reason}")]
    BadIdentifierRange {
        /// Component that failed.
        component: IdComponent,
        /// Offending component text.
        text: String,
        /// Human-readable violation.
        reason: &'static str,
    },
    /// Buffer does not hold a balanced object at its start.
    #[error("invalid JSON object: {fragment}")]
    MalformedObject {
        /// Offending input.
        fragment: String,
    },
    /// Entity header grammar did not match.
    #[error("bad {kind} representation: {fragment}")]
    BadEntityRepresentation {
        /// Entity kind being read (`vertex`, `edge`, ...).
        kind: &'static str,
        /// Offending input.
        fragment: String,
    },
    /// An identifier inside an entity header failed to decode.
    #[error("invalid {kind} {field}: {source}")]
    InvalidEntityField {
        /// Entity kind being read.
        kind: &'static str,
        /// Header slot that failed.
        field: EntityField,
        /// Identifier error.
        #[source]
        source: Box<CodecError>,
    },
    /// The property span following an entity header could not be located.
    #[error("invalid {kind} properties: {source}")]
    InvalidProperties {
        /// Entity kind being read.
        kind: &'static str,
        /// Scanner error.
        #[source]
        source: Box<CodecError>,
    },
    /// Structured property decode into the host record failed.
    #[error("cannot decode {kind} properties: {source}")]
    PropertiesDecode {
        /// Entity kind being read.
        kind: &'static str,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Host properties could not be rendered as JSON.
    #[error("cannot encode {kind} properties: {source}")]
    PropertiesEncode {
        /// Entity kind being written.
        kind: &'static str,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Array delimiters or separators are invalid.
    #[error("bad array representation: {fragment}")]
    BadSequenceRepresentation {
        /// Offending input.
        fragment: String,
    },
    /// One array element failed to decode or was rejected by its host.
    #[error("invalid element {index}: {source}")]
    InvalidSequenceElement {
        /// Zero-based element position.
        index: usize,
        /// Element error.
        #[source]
        source: Box<CodecError>,
    },
    /// Fixed-length destination does not match the decoded element count.
    #[error("number of elements is {found} but destination holds {expected}")]
    SequenceLength {
        /// Destination length.
        expected: usize,
        /// Decoded element count.
        found: usize,
    },
    /// A NULL array cannot be stored in a fixed-length destination.
    #[error("NULL array cannot be stored in a fixed-length destination")]
    NullArray,
    /// Path brackets or alternation are invalid.
    #[error("bad graphpath representation: {fragment}")]
    BadPathRepresentation {
        /// Offending input.
        fragment: String,
    },
    /// One path slot failed to decode.
    #[error("invalid path element {index}: {source}")]
    InvalidPathElement {
        /// Zero-based slot position.
        index: usize,
        /// Slot error.
        #[source]
        source: Box<CodecError>,
    },
    /// Source value kind is not readable by the target decoder.
    #[error("invalid source for {target}: {found}")]
    UnsupportedSourceType {
        /// Target kind (`graphid`, `vertex`, `_graphid`, ...).
        target: &'static str,
        /// Source kind that was supplied.
        found: &'static str,
    },
    /// Host record received a core of an unexpected shape.
    #[error("invalid {expected} core: got {found}")]
    HostCapabilityMismatch {
        /// Shape the host accepts.
        expected: &'static str,
        /// Shape that was supplied.
        found: &'static str,
    },
    /// Host-defined failure raised from a custom capability.
    #[error("host record rejected value: {0}")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CodecError {
    /// Wraps a host-defined error raised from a custom `save_*` capability.
    pub fn host<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Host(err.into())
    }

    /// Classifies this error.
    ///
    /// Wrapping variants report the layer that wrapped them: an identifier
    /// failure inside an edge header is `BadEntityRepresentation`, an entity
    /// failure inside an array is `BadSequenceRepresentation`. The property
    /// span wrapper keeps the scanner's `MalformedObject`. Use
    /// [`CodecError::root`] to reach the innermost condition.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadIdentifierFormat { .. } => ErrorKind::BadIdentifierFormat,
            Self::BadIdentifierRange { .. } => ErrorKind::BadIdentifierRange,
            Self::MalformedObject { .. } | Self::InvalidProperties { .. } => {
                ErrorKind::MalformedObject
            }
            Self::BadEntityRepresentation { .. } | Self::InvalidEntityField { .. } => {
                ErrorKind::BadEntityRepresentation
            }
            Self::PropertiesDecode { .. } | Self::PropertiesEncode { .. } => {
                ErrorKind::InvalidProperties
            }
            Self::BadSequenceRepresentation { .. }
            | Self::InvalidSequenceElement { .. }
            | Self::SequenceLength { .. }
            | Self::NullArray => ErrorKind::BadSequenceRepresentation,
            Self::BadPathRepresentation { .. } | Self::InvalidPathElement { .. } => {
                ErrorKind::BadPathRepresentation
            }
            Self::UnsupportedSourceType { .. } => ErrorKind::UnsupportedSourceType,
            Self::HostCapabilityMismatch { .. } | Self::Host(_) => {
                ErrorKind::HostCapabilityMismatch
            }
        }
    }

    /// Innermost codec error in a wrapping chain (`self` when not wrapped).
    pub fn root(&self) -> &Self {
        match self {
            Self::InvalidEntityField { source, .. }
            | Self::InvalidProperties { source, .. }
            | Self::InvalidSequenceElement { source, .. }
            | Self::InvalidPathElement { source, .. } => source.root(),
            _ => self,
        }
    }
}
