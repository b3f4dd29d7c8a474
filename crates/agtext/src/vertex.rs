// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex header grammar and the reference vertex records.
//!
//! Wire form: `label[label.local]{...}`. The label is the shortest prefix
//! that lets the rest of the header match, so labels may themselves contain
//! brackets.

use std::fmt;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::entity::{
    check_written_label, display_entity, header_id, header_label, property_span,
    write_header_id, Core, Entity, EntityData, EntityReader, WriteEntity,
};
use crate::error::{fragment, CodecError, EntityField};
use crate::graphid::GraphId;
use crate::reader::{lazy_label, Reader};

/// Property bag used when a host does not name its own property type.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Decoded vertex header.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexCore {
    /// Vertex label.
    pub label: String,
    /// Vertex id.
    pub id: GraphId,
}

/// `[id]` after the label.
fn vertex_tail<'a>(r: &mut Reader<'a>) -> Option<&'a [u8]> {
    r.eat(b'[')?;
    let id = r.graph_id()?;
    r.eat(b']')?;
    Some(id)
}

/// Reads `label[id]` followed by the property object.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexReader;

impl EntityReader for VertexReader {
    const NAME: &'static str = "vertex";

    fn read_entity<'a>(
        src: &'a [u8],
        config: &CodecConfig,
    ) -> Result<EntityData<'a>, CodecError> {
        let (label, id, header_len) = lazy_label(src, vertex_tail).ok_or_else(|| CodecError::BadEntityRepresentation {
            kind: Self::NAME,
            fragment: fragment(src),
        })?;

        let core = VertexCore {
            label: header_label(Self::NAME, src, label)?,
            id: header_id(Self::NAME, EntityField::Id, id, config)?,
        };
        let (properties, consumed) = property_span(Self::NAME, &src[header_len..], config)?;
        Ok(EntityData {
            core: Core::Vertex(core),
            properties,
            len: header_len + consumed,
        })
    }
}

/// Vertex header fields with a validity flag, for embedding in host records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexHeader {
    /// `false` for a NULL vertex.
    pub valid: bool,
    /// Vertex label.
    pub label: String,
    /// Vertex id.
    pub id: GraphId,
}

impl VertexHeader {
    /// Store a decoded core; `None` marks the header NULL.
    pub fn save(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        match core {
            None => {
                *self = Self::default();
                Ok(())
            }
            Some(Core::Vertex(core)) => {
                self.valid = true;
                self.label = core.label;
                self.id = core.id;
                Ok(())
            }
            Some(other) => Err(CodecError::HostCapabilityMismatch {
                expected: VertexReader::NAME,
                found: other.shape(),
            }),
        }
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let start = out.len();
        out.extend_from_slice(self.label.as_bytes());
        out.push(b'[');
        write_header_id(VertexReader::NAME, EntityField::Id, &self.id, out)?;
        out.push(b']');
        let read_back = lazy_label(&out[start..], vertex_tail).map(|(label, _, _)| label);
        check_written_label(VertexReader::NAME, &self.label, read_back)
    }
}

/// A header-only host: properties are checked for well-formed JSON and dropped.
impl Entity for VertexHeader {
    type Reader = VertexReader;
    type Properties = IgnoredAny;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        self.save(core)
    }
}

/// Reference vertex record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vertex<P = Properties> {
    /// Label, id and validity.
    #[serde(flatten)]
    pub header: VertexHeader,
    /// Decoded property object.
    #[serde(default)]
    pub properties: P,
}

impl<P> Vertex<P> {
    /// Returns `true` when this record holds a NULL vertex.
    pub fn is_null(&self) -> bool {
        !self.header.valid
    }
}

impl<P> Entity for Vertex<P>
where
    P: DeserializeOwned + Default,
{
    type Reader = VertexReader;
    type Properties = P;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        if core.is_none() {
            self.properties = P::default();
        }
        self.header.save(core)
    }

    fn store_properties(&mut self, properties: P) -> Result<(), CodecError> {
        self.properties = properties;
        Ok(())
    }
}

impl<P: Serialize> WriteEntity for Vertex<P> {
    fn is_null(&self) -> bool {
        !self.header.valid
    }

    fn write_entity(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.header.write(out)?;
        serde_json::to_writer(&mut *out, &self.properties).map_err(|source| {
            CodecError::PropertiesEncode {
                kind: VertexReader::NAME,
                source,
            }
        })
    }
}

impl<P: Serialize> fmt::Display for Vertex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_entity(self, f)
    }
}
