// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Values handed to the codec by the database driver.

use crate::entity::EntityData;
use crate::error::CodecError;

/// One column value as the driver delivers it.
///
/// The codec reads text-format values only: `Bytes` or `Text`, plus `Null`
/// for the out-of-band "no value" marker. The scalar variants exist so a
/// driver can forward whatever it has and get a precise
/// [`CodecError::UnsupportedSourceType`] back. `Entity` carries a header that
/// was already split from its properties (array and path decoding).
#[derive(Debug, Clone)]
pub enum Source<'a> {
    /// SQL NULL: the column has no value.
    Null,
    /// Raw text-format bytes.
    Bytes(&'a [u8]),
    /// Text-format value already validated as UTF-8.
    Text(&'a str),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Pre-split entity header and property span.
    Entity(EntityData<'a>),
}

impl<'a> Source<'a> {
    /// Short name of this value kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Entity(_) => "entity data",
        }
    }

    /// Text bytes of this value: `None` for NULL, an error for non-text kinds.
    pub(crate) fn text_bytes(&self, target: &'static str) -> Result<Option<&'a [u8]>, CodecError> {
        match *self {
            Self::Null => Ok(None),
            Self::Bytes(bytes) => Ok(Some(bytes)),
            Self::Text(text) => Ok(Some(text.as_bytes())),
            ref other => Err(CodecError::UnsupportedSourceType {
                target,
                found: other.type_name(),
            }),
        }
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<Option<&'a [u8]>> for Source<'a> {
    fn from(bytes: Option<&'a [u8]>) -> Self {
        bytes.map_or(Self::Null, Self::Bytes)
    }
}

impl<'a> From<EntityData<'a>> for Source<'a> {
    fn from(data: EntityData<'a>) -> Self {
        Self::Entity(data)
    }
}
