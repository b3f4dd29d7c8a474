// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge header grammar and the reference edge records.
//!
//! Wire form: `label[id][start,end]{...}`.

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
use crate::vertex::Properties;

/// Decoded edge header.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCore {
    /// Edge label.
    pub label: String,
    /// Edge id.
    pub id: GraphId,
    /// Id of the vertex the edge leaves.
    pub start: GraphId,
    /// Id of the vertex the edge enters.
    pub end: GraphId,
}

type EdgeIds<'a> = (&'a [u8], &'a [u8], &'a [u8]);

/// `[id][start,end]` after the label.
fn edge_tail<'a>(r: &mut Reader<'a>) -> Option<EdgeIds<'a>> {
    r.eat(b'[')?;
    let id = r.graph_id()?;
    r.eat(b']')?;
    r.eat(b'[')?;
    let start = r.graph_id()?;
    r.eat(b',')?;
    let end = r.graph_id()?;
    r.eat(b']')?;
    Some((id, start, end))
}

/// Reads `label[id][start,end]` followed by the property object.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeReader;

impl EntityReader for EdgeReader {
    const NAME: &'static str = "edge";

    fn read_entity<'a>(
        src: &'a [u8],
        config: &CodecConfig,
    ) -> Result<EntityData<'a>, CodecError> {
        let (label, (id, start, end), header_len) = lazy_label(src, edge_tail).ok_or_else(|| CodecError::BadEntityRepresentation {
            kind: Self::NAME,
            fragment: fragment(src),
        })?;

        let core = EdgeCore {
            label: header_label(Self::NAME, src, label)?,
            id: header_id(Self::NAME, EntityField::Id, id, config)?,
            start: header_id(Self::NAME, EntityField::Start, start, config)?,
            end: header_id(Self::NAME, EntityField::End, end, config)?,
        };
        let (properties, consumed) = property_span(Self::NAME, &src[header_len..], config)?;
        Ok(EntityData {
            core: Core::Edge(core),
            properties,
            len: header_len + consumed,
        })
    }
}

/// Edge header fields with a validity flag, for embedding in host records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeHeader {
    /// `false` for a NULL edge.
    pub valid: bool,
    /// Edge label.
    pub label: String,
    /// Edge id.
    pub id: GraphId,
    /// Start vertex id.
    pub start: GraphId,
    /// End vertex id.
    pub end: GraphId,
}

impl EdgeHeader {
    /// Store a decoded core; `None` marks the header NULL.
    pub fn save(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        match core {
            None => {
                *self = Self::default();
                Ok(())
            }
            Some(Core::Edge(core)) => {
                self.valid = true;
                self.label = core.label;
                self.id = core.id;
                self.start = core.start;
                self.end = core.end;
                Ok(())
            }
            Some(other) => Err(CodecError::HostCapabilityMismatch {
                expected: EdgeReader::NAME,
                found: other.shape(),
            }),
        }
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let kind = EdgeReader::NAME;
        let start = out.len();
        out.extend_from_slice(self.label.as_bytes());
        out.push(b'[');
        write_header_id(kind, EntityField::Id, &self.id, out)?;
        out.extend_from_slice(b"][");
        write_header_id(kind, EntityField::Start, &self.start, out)?;
        out.push(b',');
        write_header_id(kind, EntityField::End, &self.end, out)?;
        out.push(b']');
        let read_back = lazy_label(&out[start..], edge_tail).map(|(label, _, _)| label);
        check_written_label(kind, &self.label, read_back)
    }
}

/// A header-only host: properties are checked for well-formed JSON and dropped.
impl Entity for EdgeHeader {
    type Reader = EdgeReader;
    type Properties = IgnoredAny;

    fn save_entity(&mut self, core: Option<Core>) -> Result<(), CodecError> {
        self.save(core)
    }
}

/// Reference edge record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Edge<P = Properties> {
    /// Label, ids and validity.
    #[serde(flatten)]
    pub header: EdgeHeader,
    /// Decoded property object.
    #[serde(default)]
    pub properties: P,
}

impl<P> Edge<P> {
    /// Returns `true` when this record holds a NULL edge.
    pub fn is_null(&self) -> bool {
        !self.header.valid
    }
}

impl<P> Entity for Edge<P>
where
    P: DeserializeOwned + Default,
{
    type Reader = EdgeReader;
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

impl<P: Serialize> WriteEntity for Edge<P> {
    fn is_null(&self) -> bool {
        !self.header.valid
    }

    fn write_entity(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.header.write(out)?;
        serde_json::to_writer(&mut *out, &self.properties).map_err(|source| {
            CodecError::PropertiesEncode {
                kind: EdgeReader::NAME,
                source,
            }
        })
    }
}

impl<P: Serialize> fmt::Display for Edge<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_entity(self, f)
    }
}
