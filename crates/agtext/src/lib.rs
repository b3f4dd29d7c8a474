// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text wire codec for graph query results.
//!
//! `agtext` converts between the textual column values a graph database
//! returns and typed records:
//!
//! - graph ids: `3.1` (16-bit label id, 48-bit local id);
//! - vertices: `person[3.1]{"name":"ann"}`;
//! - edges: `knows[4.1][3.1,3.2]{"since":2020}`;
//! - arrays: `{1.1,NULL}` for ids, `[v[3.1]{},NULL]` for entities;
//! - paths: `[v[3.1]{},e[4.1][3.1,3.2]{},v[3.2]{}]`.
//!
//! Decoding writes into caller-owned records through the [`Entity`] and
//! [`PathSaver`] traits; the reference records [`Vertex`], [`Edge`] and
//! [`Path`] implement them, and any host struct can too.
//!
//! NULL, empty and populated stay distinct everywhere: an absent source is
//! NULL, `{}`/`[]` are empty, and the `NULL` token marks NULL elements.
//!
//! ```
//! use agtext::{Codec, Source, Vertex};
//!
//! # fn main() -> Result<(), agtext::CodecError> {
//! let codec = Codec::default();
//! let mut v: Vertex = Vertex::default();
//! codec.decode_entity(Source::from(r#"person[3.1]{"name":"ann"}"#), &mut v)?;
//! assert_eq!(v.header.label, "person");
//! assert_eq!(v.properties["name"], "ann");
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod array;
mod codec;
mod config;
mod edge;
mod entity;
mod error;
mod graphid;
mod path;
mod reader;
mod scan;
mod source;
mod vertex;

pub use array::{read_elements, write_elements, Delimiters};
pub use codec::Codec;
pub use config::{CodecConfig, ConfigError, EmptyProperties, IdRange};
pub use edge::{Edge, EdgeCore, EdgeHeader, EdgeReader};
pub use entity::{save_entity_data, Core, Entity, EntityData, EntityReader, WriteEntity};
pub use error::{CodecError, EntityField, ErrorKind, IdComponent};
pub use graphid::{GraphId, LOCAL_ID_MAX, NULL_TOKEN};
pub use path::{Path, PathSaver};
pub use scan::object_len;
pub use source::Source;
pub use vertex::{Properties, Vertex, VertexCore, VertexHeader, VertexReader};
