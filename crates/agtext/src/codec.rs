// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed entry points: one decode/encode pair per wire type.
//!
//! [`Codec`] carries the [`CodecConfig`] through every call and emits
//! `tracing` events (`trace` on entry, `debug` on failure). It holds no other
//! state and is `Copy`, so a single instance can be shared freely.

use std::convert::Infallible;

use tracing::{debug, instrument, trace};

use crate::array::{read_elements, write_elements, Delimiters};
use crate::config::CodecConfig;
use crate::entity::{save_entity_data, Entity, EntityData, EntityReader, WriteEntity};
use crate::error::{fragment, CodecError};
use crate::graphid::GraphId;
use crate::path::{read_path, PathSaver};
use crate::source::Source;

const GRAPHID: &str = "graphid";
const GRAPHID_ARRAY: &str = "graphid array";
const ENTITY_ARRAY: &str = "entity array";
const GRAPHPATH: &str = "graphpath";

/// Decoder/encoder for the text wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: CodecConfig,
}

fn log_failure(target: &'static str) -> impl Fn(&CodecError) {
    move |err: &CodecError| {
        debug!(target_kind = target, kind = ?err.kind(), error = %err, "decode failed");
    }
}

impl Codec {
    /// Create a codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a single graph id. An absent source is NULL.
    #[instrument(level = "trace", skip_all, fields(source = src.type_name()))]
    pub fn decode_id(&self, src: Source<'_>) -> Result<GraphId, CodecError> {
        src.text_bytes(GRAPHID)
            .and_then(|bytes| GraphId::decode(bytes, self.config.id_range))
            .inspect_err(log_failure(GRAPHID))
    }

    /// Encode a single graph id; NULL is the absent value.
    pub fn encode_id(&self, id: &GraphId) -> Option<Vec<u8>> {
        trace!(%id, "encode graphid");
        id.encode()
    }

    /// Decode a `{...}` identifier array.
    ///
    /// Absent source → `None`; `{}` → empty; `NULL` elements decode to
    /// [`GraphId::NULL`].
    #[instrument(level = "trace", skip_all, fields(source = src.type_name()))]
    pub fn decode_ids(&self, src: Source<'_>) -> Result<Option<Vec<GraphId>>, CodecError> {
        let range = self.config.id_range;
        let decode = |bytes: &[u8]| {
            read_elements(bytes, Delimiters::BRACES, |rest| {
                let len = rest
                    .iter()
                    .position(|&b| b == Delimiters::BRACES.separator)
                    .unwrap_or(rest.len());
                GraphId::decode(Some(&rest[..len]), range).map(|id| (len, id))
            })
        };
        let ids = match src.text_bytes(GRAPHID_ARRAY)? {
            None => None,
            Some(bytes) => Some(
                decode(bytes)
                    .inspect_err(log_failure(GRAPHID_ARRAY))?
                    .into_iter()
                    .map(|id| id.unwrap_or(GraphId::NULL))
                    .collect(),
            ),
        };
        Ok(ids)
    }

    /// Encode an identifier array; `None` is the absent value.
    pub fn encode_ids(&self, ids: Option<&[GraphId]>) -> Option<Vec<u8>> {
        let ids = ids?;
        trace!(len = ids.len(), "encode graphid array");
        let rendered = write_elements(ids, Delimiters::BRACES, |id, out| {
            id.write_element(out);
            Ok::<_, Infallible>(true)
        });
        match rendered {
            Ok(bytes) => Some(bytes),
            Err(never) => match never {},
        }
    }

    /// Decode one entity into `host`.
    ///
    /// An absent source calls `save_entity(None)` and nothing else. Text input
    /// must be consumed completely.
    #[instrument(level = "trace", skip_all, fields(kind = T::Reader::NAME, source = src.type_name()))]
    pub fn decode_entity<T>(&self, src: Source<'_>, host: &mut T) -> Result<(), CodecError>
    where
        T: Entity + ?Sized,
    {
        self.dispatch_entity(src, host)
            .inspect_err(log_failure(T::Reader::NAME))
    }

    fn dispatch_entity<T>(&self, src: Source<'_>, host: &mut T) -> Result<(), CodecError>
    where
        T: Entity + ?Sized,
    {
        let bytes = match src {
            Source::Null => return save_entity_data(None, host),
            Source::Entity(data) => return save_entity_data(Some(data), host),
            other => other.text_bytes(T::Reader::NAME)?,
        };
        let Some(bytes) = bytes else {
            return save_entity_data(None, host);
        };
        let data = self.read_whole::<T::Reader>(bytes)?;
        save_entity_data(Some(data), host)
    }

    /// Read one entity that must span all of `bytes`.
    fn read_whole<'a, R: EntityReader>(
        &self,
        bytes: &'a [u8],
    ) -> Result<EntityData<'a>, CodecError> {
        let data = R::read_entity(bytes, &self.config)?;
        if data.len != bytes.len() {
            return Err(CodecError::BadEntityRepresentation {
                kind: R::NAME,
                fragment: fragment(bytes),
            });
        }
        Ok(data)
    }

    /// Encode one entity; a NULL record is the absent value.
    pub fn encode_entity<T>(&self, entity: &T) -> Result<Option<Vec<u8>>, CodecError>
    where
        T: WriteEntity + ?Sized,
    {
        if entity.is_null() {
            trace!("encode NULL entity");
            return Ok(None);
        }
        let mut out = Vec::new();
        entity.write_entity(&mut out)?;
        trace!(len = out.len(), "encode entity");
        Ok(Some(out))
    }

    /// Decode a `[...]` entity array into fresh host records.
    ///
    /// Absent source → `None`; `[]` → empty; `NULL` elements become records
    /// marked NULL through `save_entity(None)`.
    #[instrument(level = "trace", skip_all, fields(kind = T::Reader::NAME, source = src.type_name()))]
    pub fn decode_entities<T>(&self, src: Source<'_>) -> Result<Option<Vec<T>>, CodecError>
    where
        T: Entity + Default,
    {
        let Some(slots) = self.entity_slots::<T::Reader>(&src)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            let mut host = T::default();
            save_entity_data(slot, &mut host)
                .map_err(|source| element_error(index, source))
                .inspect_err(log_failure(ENTITY_ARRAY))?;
            out.push(host);
        }
        Ok(Some(out))
    }

    /// Decode a `[...]` entity array into a fixed-length destination.
    ///
    /// # Errors
    ///
    /// [`CodecError::NullArray`] for an absent source;
    /// [`CodecError::SequenceLength`] when the element count differs from
    /// `hosts.len()`.
    #[instrument(level = "trace", skip_all, fields(kind = T::Reader::NAME, len = hosts.len()))]
    pub fn decode_entities_into<T>(&self, src: Source<'_>, hosts: &mut [T]) -> Result<(), CodecError>
    where
        T: Entity,
    {
        let slots = self
            .entity_slots::<T::Reader>(&src)?
            .ok_or(CodecError::NullArray)
            .inspect_err(log_failure(ENTITY_ARRAY))?;
        if slots.len() != hosts.len() {
            let err = CodecError::SequenceLength {
                expected: hosts.len(),
                found: slots.len(),
            };
            log_failure(ENTITY_ARRAY)(&err);
            return Err(err);
        }
        for (index, (slot, host)) in slots.into_iter().zip(hosts.iter_mut()).enumerate() {
            save_entity_data(slot, host)
                .map_err(|source| element_error(index, source))
                .inspect_err(log_failure(ENTITY_ARRAY))?;
        }
        Ok(())
    }

    fn entity_slots<'a, R: EntityReader>(
        &self,
        src: &Source<'a>,
    ) -> Result<Option<Vec<Option<EntityData<'a>>>>, CodecError> {
        let Some(bytes) = src.text_bytes(ENTITY_ARRAY)? else {
            return Ok(None);
        };
        read_elements(bytes, Delimiters::BRACKETS, |rest| {
            R::read_entity(rest, &self.config).map(|data| (data.len, data))
        })
        .map(Some)
        .inspect_err(log_failure(ENTITY_ARRAY))
    }

    /// Encode an entity array; `None` is the absent value and NULL records
    /// render as the `NULL` token.
    pub fn encode_entities<T>(&self, entities: Option<&[T]>) -> Result<Option<Vec<u8>>, CodecError>
    where
        T: WriteEntity,
    {
        let Some(entities) = entities else {
            return Ok(None);
        };
        trace!(len = entities.len(), "encode entity array");
        write_elements(entities, Delimiters::BRACKETS, |entity, out| -> Result<bool, CodecError> {
            if entity.is_null() {
                return Ok(false);
            }
            entity.write_entity(out)?;
            Ok(true)
        })
        .map(Some)
    }

    /// Decode a path into `host`.
    ///
    /// An absent source and the `NULL` token both call `save_path(None)`.
    #[instrument(level = "trace", skip_all, fields(source = src.type_name()))]
    pub fn decode_path<P>(&self, src: Source<'_>, host: &mut P) -> Result<(), CodecError>
    where
        P: PathSaver + ?Sized,
    {
        let result = match src.text_bytes(GRAPHPATH) {
            Ok(None) => host.save_path(None),
            Ok(Some(bytes)) => read_path::<P::VertexReader, P::EdgeReader>(bytes, &self.config)
                .and_then(|slots| host.save_path(slots)),
            Err(err) => Err(err),
        };
        result.inspect_err(log_failure(GRAPHPATH))
    }

    /// Encode a path; a NULL path is the absent value.
    pub fn encode_path<P>(&self, path: &P) -> Result<Option<Vec<u8>>, CodecError>
    where
        P: WriteEntity + ?Sized,
    {
        self.encode_entity(path)
    }
}

fn element_error(index: usize, source: CodecError) -> CodecError {
    CodecError::InvalidSequenceElement {
        index,
        source: Box::new(source),
    }
}
