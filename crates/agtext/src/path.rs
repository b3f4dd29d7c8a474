// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph path codec.
//!
//! Wire form: `[v,e,v,...,v]`, a bracketed alternation that starts and ends
//! on a vertex. Any slot may be the `NULL` token. `[]` is an empty (but
//! valid) path; the bare `NULL` token is a NULL path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::array::{is_null_element, Delimiters};
use crate::config::CodecConfig;
use crate::edge::Edge;
use crate::entity::{
    display_entity, save_entity_data, Entity, EntityData, EntityReader, WriteEntity,
};
use crate::error::{fragment, CodecError};
use crate::graphid::NULL_TOKEN;
use crate::vertex::Vertex;

/// A host record the codec can decode a path into.
pub trait PathSaver {
    /// Grammar for even slots.
    type VertexReader: EntityReader;
    /// Grammar for odd slots.
    type EdgeReader: EntityReader;

    /// Store the decoded slots in order, or mark the path NULL when `None`.
    ///
    /// A `None` slot is a NULL element.
    fn save_path(&mut self, slots: Option<Vec<Option<EntityData<'_>>>>) -> Result<(), CodecError>;
}

/// Split path text into slots without dispatching them.
pub(crate) fn read_path<'a, V, E>(
    src: &'a [u8],
    config: &CodecConfig,
) -> Result<Option<Vec<Option<EntityData<'a>>>>, CodecError>
where
    V: EntityReader,
    E: EntityReader,
{
    if src == NULL_TOKEN.as_bytes() {
        return Ok(None);
    }
    let bad = || CodecError::BadPathRepresentation {
        fragment: fragment(src),
    };
    if src.first() != Some(&b'[') {
        return Err(bad());
    }

    let delims = Delimiters::BRACKETS;
    let mut slots = Vec::new();
    let mut pos = 1;
    if src.get(pos) == Some(&delims.close) {
        pos += 1;
    } else {
        loop {
            let index = slots.len();
            let rest = &src[pos..];
            if is_null_element(rest, delims) {
                pos += NULL_TOKEN.len();
                slots.push(None);
            } else {
                let data = if index.is_multiple_of(2) {
                    V::read_entity(rest, config)
                } else {
                    E::read_entity(rest, config)
                }
                .map_err(|source| CodecError::InvalidPathElement {
                    index,
                    source: Box::new(source),
                })?;
                pos += data.len;
                slots.push(Some(data));
            }

            match src.get(pos) {
                Some(&b) if b == delims.separator => pos += 1,
                Some(&b) if b == delims.close => {
                    pos += 1;
                    break;
                }
                _ => return Err(bad()),
            }
        }
    }

    if pos != src.len() || (!slots.is_empty() && slots.len().is_multiple_of(2)) {
        return Err(bad());
    }
    Ok(Some(slots))
}

/// Reference path record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Path<V = Vertex, E = Edge> {
    /// `false` for a NULL path.
    pub valid: bool,
    /// Vertices in path order (`n + 1` of them for `n` edges).
    pub vertices: Vec<V>,
    /// Edges in path order.
    pub edges: Vec<E>,
}

impl<V, E> PathSaver for Path<V, E>
where
    V: Entity + Default,
    E: Entity + Default,
{
    type VertexReader = V::Reader;
    type EdgeReader = E::Reader;

    fn save_path(&mut self, slots: Option<Vec<Option<EntityData<'_>>>>) -> Result<(), CodecError> {
        self.vertices.clear();
        self.edges.clear();
        let Some(slots) = slots else {
            self.valid = false;
            return Ok(());
        };

        for (index, slot) in slots.into_iter().enumerate() {
            let wrap = |source| CodecError::InvalidPathElement {
                index,
                source: Box::new(source),
            };
            if index.is_multiple_of(2) {
                let mut vertex = V::default();
                save_entity_data(slot, &mut vertex).map_err(wrap)?;
                self.vertices.push(vertex);
            } else {
                let mut edge = E::default();
                save_entity_data(slot, &mut edge).map_err(wrap)?;
                self.edges.push(edge);
            }
        }
        self.valid = true;
        Ok(())
    }
}

impl<V: WriteEntity, E: WriteEntity> WriteEntity for Path<V, E> {
    fn is_null(&self) -> bool {
        !self.valid
    }

    fn write_entity(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let (vertices, edges) = (self.vertices.len(), self.edges.len());
        if vertices != edges + 1 && (vertices, edges) != (0, 0) {
            return Err(CodecError::BadPathRepresentation {
                fragment: format!("{vertices} vertices with {edges} edges"),
            });
        }
        let delims = Delimiters::BRACKETS;
        out.push(delims.open);
        for (index, vertex) in self.vertices.iter().enumerate() {
            if index > 0 {
                out.push(delims.separator);
                if let Some(edge) = self.edges.get(index - 1) {
                    write_slot(edge, out)?;
                    out.push(delims.separator);
                }
            }
            write_slot(vertex, out)?;
        }
        out.push(delims.close);
        Ok(())
    }
}

fn write_slot<T: WriteEntity>(slot: &T, out: &mut Vec<u8>) -> Result<(), CodecError> {
    if slot.is_null() {
        out.extend_from_slice(NULL_TOKEN.as_bytes());
        Ok(())
    } else {
        slot.write_entity(out)
    }
}

impl<V: WriteEntity, E: WriteEntity> fmt::Display for Path<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_entity(self, f)
    }
}

impl<V, E> Path<V, E> {
    /// Number of edges (the path length).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` for a NULL path or a path without vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
