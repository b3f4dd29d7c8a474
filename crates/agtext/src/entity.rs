// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Entity dispatch protocol.
//!
//! The codec never knows the shape of the record it decodes into. A host
//! record becomes decodable by implementing [`Entity`]:
//!
//! 1. **read header**: `type Reader: EntityReader` splits raw bytes into a
//!    [`Core`] and the raw property span ([`VertexReader`] and [`EdgeReader`]
//!    are built in);
//! 2. **accept core**: [`Entity::save_entity`] stores the identifying fields,
//!    or marks the record NULL when handed `None`;
//! 3. **accept properties** (optional): [`Entity::save_properties`] receives
//!    the raw property bytes. The default performs a structured decode into
//!    [`Entity::Properties`] and hands the result to
//!    [`Entity::store_properties`].
//!
//! Decoding writes into the caller's record in place. The codec assumes
//! exclusive access to the record for the duration of one call; after a
//! failed call the record's contents are unspecified and it should be
//! discarded or reset.
//!
//! [`VertexReader`]: crate::vertex::VertexReader
//! [`EdgeReader`]: crate::edge::EdgeReader

use std::fmt;

use serde::de::DeserializeOwned;

use crate::config::{CodecConfig, EmptyProperties};
use crate::edge::EdgeCore;
use crate::error::{CodecError, EntityField};
use crate::graphid::{GraphId, NULL_TOKEN};
use crate::scan;
use crate::vertex::VertexCore;

/// Identifying header of an entity, without its properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Core {
    /// Vertex header.
    Vertex(VertexCore),
    /// Edge header.
    Edge(EdgeCore),
}

impl Core {
    /// Name of this core's shape (`vertex` or `edge`).
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Vertex(_) => "vertex",
            Self::Edge(_) => "edge",
        }
    }

    /// Label text of the entity.
    pub fn label(&self) -> &str {
        match self {
            Self::Vertex(core) => &core.label,
            Self::Edge(core) => &core.label,
        }
    }

    /// The entity's own id.
    pub fn id(&self) -> GraphId {
        match self {
            Self::Vertex(core) => core.id,
            Self::Edge(core) => core.id,
        }
    }
}

/// A decoded core paired with the raw bytes of its property object.
///
/// Borrowed from the input buffer and consumed by a single dispatch; never
/// retained past the decode call that produced it.
#[derive(Debug, Clone)]
pub struct EntityData<'a> {
    /// Decoded header.
    pub core: Core,
    /// Raw property object (`{...}`).
    pub properties: &'a [u8],
    /// Input bytes consumed (header plus property object).
    pub len: usize,
}

/// Capability 1: reads an entity header and locates its property span.
pub trait EntityReader {
    /// Entity kind named in errors (`vertex`, `edge`, ...).
    const NAME: &'static str;

    /// Read one entity from the start of `src`.
    ///
    /// Must stop at the end of the property object: bytes after it belong to
    /// the caller (array separators, the rest of a path).
    fn read_entity<'a>(src: &'a [u8], config: &CodecConfig)
        -> Result<EntityData<'a>, CodecError>;
}

/// A host record the codec can decode into.
pub trait Entity {
    /// Header grammar for this record.
    type Reader: EntityReader;

    /// Target of the default structured property decode.
    ///
    /// Hosts that override [`Entity::save_properties`] typically use
    /// [`serde::de::IgnoredAny`].
    type Properties: DeserializeOwned;

    /// Store the decoded header, or mark the record NULL when `core` is `None`.
    ///
    /// Return [`CodecError::HostCapabilityMismatch`] when the core has a shape
    /// this record cannot hold.
    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError>;

    /// Receive the result of the default structured property decode.
    fn store_properties(&mut self, _properties: Self::Properties) -> Result<(), CodecError> {
        Ok(())
    }

    /// Store the raw property object. Never called for NULL records.
    fn save_properties(&mut self, raw: &[u8]) -> Result<(), CodecError> {
        let properties =
            serde_json::from_slice(raw).map_err(|source| CodecError::PropertiesDecode {
                kind: Self::Reader::NAME,
                source,
            })?;
        self.store_properties(properties)
    }
}

/// Renders a host record back into wire text.
pub trait WriteEntity {
    /// Returns `true` when the record is NULL.
    fn is_null(&self) -> bool;

    /// Append the wire form of a non-NULL record to `out`.
    fn write_entity(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;
}

/// Hand one decoded slot to a host record.
///
/// `None` marks the record NULL and stops; otherwise the core is stored first
/// and the properties second.
pub fn save_entity_data<T>(data: Option<EntityData<'_>>, entity: &mut T) -> Result<(), CodecError>
where
    T: Entity + ?Sized,
{
    let Some(data) = data else {
        return entity.save_entity(None);
    };
    entity.save_entity(Some(data.core))?;
    entity.save_properties(data.properties)
}

/// Decode one header id, naming the field on failure.
pub(crate) fn header_id(
    kind: &'static str,
    field: EntityField,
    text: &[u8],
    config: &CodecConfig,
) -> Result<GraphId, CodecError> {
    GraphId::decode(Some(text), config.id_range).map_err(|source| CodecError::InvalidEntityField {
        kind,
        field,
        source: Box::new(source),
    })
}

/// Append one header id; a NULL id has no header form.
pub(crate) fn write_header_id(
    kind: &'static str,
    field: EntityField,
    id: &GraphId,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    if id.is_null() {
        return Err(CodecError::InvalidEntityField {
            kind,
            field,
            source: Box::new(CodecError::BadIdentifierFormat {
                text: NULL_TOKEN.to_owned(),
            }),
        });
    }
    id.write_element(out);
    Ok(())
}

/// Check that a written header reads back with the same label.
///
/// `read_back` is the label the header grammar finds in the written bytes.
/// Empty labels, labels spanning a newline and labels that end early at an
/// embedded `[id]` all fail here.
pub(crate) fn check_written_label(
    kind: &'static str,
    label: &str,
    read_back: Option<&[u8]>,
) -> Result<(), CodecError> {
    if read_back == Some(label.as_bytes()) {
        Ok(())
    } else {
        Err(CodecError::BadEntityRepresentation {
            kind,
            fragment: crate::error::fragment(label.as_bytes()),
        })
    }
}

/// Locate the property object after a header: `(span, bytes consumed)`.
pub(crate) fn property_span<'a>(
    kind: &'static str,
    rest: &'a [u8],
    config: &CodecConfig,
) -> Result<(&'a [u8], usize), CodecError> {
    if config.empty_properties == EmptyProperties::ImplicitEmpty
        && matches!(rest.first(), None | Some(b',' | b']'))
    {
        return Ok((&b"{}"[..], 0));
    }
    let len = scan::object_len(rest).map_err(|source| CodecError::InvalidProperties {
        kind,
        source: Box::new(source),
    })?;
    Ok((&rest[..len], len))
}

/// `Display` body shared by the reference records: wire form or `NULL`.
pub(crate) fn display_entity<T>(entity: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: WriteEntity + ?Sized,
{
    if entity.is_null() {
        return f.write_str(NULL_TOKEN);
    }
    let mut out = Vec::new();
    match entity.write_entity(&mut out) {
        Ok(()) => f.write_str(&String::from_utf8_lossy(&out)),
        // No wire form: render the encode error instead.
        Err(err) => write!(f, "<{err}>"),
    }
}

/// Label bytes as an owned string.
pub(crate) fn header_label(
    kind: &'static str,
    src: &[u8],
    label: &[u8],
) -> Result<String, CodecError> {
    std::str::from_utf8(label)
        .map(str::to_owned)
        .map_err(|_| CodecError::BadEntityRepresentation {
            kind,
            fragment: crate::error::fragment(src),
        })
}
