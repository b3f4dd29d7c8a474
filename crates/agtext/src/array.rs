// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delimited sequence codec shared by identifier and entity arrays.
//!
//! One generic reader and one generic writer, parameterised by the delimiter
//! set and an element strategy:
//!
//! - identifier arrays use braces: `{1.1,NULL,2.7}`;
//! - entity arrays use brackets: `[v[3.1]{},NULL]`.
//!
//! The three states of a sequence stay distinct: the caller maps an absent
//! source to `None`, an empty interior decodes to an empty vec, and anything
//! else to its elements. Inside the delimiters the `NULL` token is a NULL
//! element; it is recognised here, before the element strategy runs.

use crate::error::{fragment, CodecError};
use crate::graphid::NULL_TOKEN;

/// Opening, closing, and separator bytes of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Opening delimiter.
    pub open: u8,
    /// Closing delimiter.
    pub close: u8,
    /// Element separator.
    pub separator: u8,
}

impl Delimiters {
    /// Identifier arrays: `{a,b}`.
    pub const BRACES: Self = Self {
        open: b'{',
        close: b'}',
        separator: b',',
    };

    /// Entity arrays and paths: `[a,b]`.
    pub const BRACKETS: Self = Self {
        open: b'[',
        close: b']',
        separator: b',',
    };
}

/// Returns `true` when `rest` starts with a complete `NULL` element.
///
/// The token must be followed by a separator, the closing delimiter, or the
/// end of input, so a label such as `NULLish[1.1]{}` is not mistaken for it.
pub(crate) fn is_null_element(rest: &[u8], delims: Delimiters) -> bool {
    match rest.strip_prefix(NULL_TOKEN.as_bytes()) {
        Some(after) => match after.first() {
            None => true,
            Some(&b) => b == delims.separator || b == delims.close,
        },
        None => false,
    }
}

/// Split a delimited sequence into elements.
///
/// `read` receives the remaining interior (closing delimiter excluded) and
/// returns how many bytes its element consumed. Each element must be followed
/// by exactly one separator or by the end of the interior.
///
/// # Errors
///
/// [`CodecError::BadSequenceRepresentation`] for missing delimiters, a
/// missing or doubled separator, or a trailing separator;
/// [`CodecError::InvalidSequenceElement`] wrapping the strategy's error.
pub fn read_elements<'a, E, F>(
    src: &'a [u8],
    delims: Delimiters,
    mut read: F,
) -> Result<Vec<Option<E>>, CodecError>
where
    F: FnMut(&'a [u8]) -> Result<(usize, E), CodecError>,
{
    let bad = || CodecError::BadSequenceRepresentation {
        fragment: fragment(src),
    };
    let inner = match src {
        [open, inner @ .., close] if *open == delims.open && *close == delims.close => inner,
        _ => return Err(bad()),
    };

    let mut out = Vec::new();
    if inner.is_empty() {
        return Ok(out);
    }

    let mut pos = 0;
    loop {
        let index = out.len();
        let rest = &inner[pos..];
        if is_null_element(rest, delims) {
            pos += NULL_TOKEN.len();
            out.push(None);
        } else {
            let (len, element) = read(rest).map_err(|source| {
                CodecError::InvalidSequenceElement {
                    index,
                    source: Box::new(source),
                }
            })?;
            pos += len;
            out.push(Some(element));
        }

        match inner.get(pos) {
            None if pos == inner.len() => return Ok(out),
            Some(&b) if b == delims.separator && pos + 1 < inner.len() => pos += 1,
            _ => return Err(bad()),
        }
    }
}

/// Render a delimited sequence.
///
/// `write` appends one element and returns `true`, or returns `false` without
/// writing anything for a NULL element, which is then rendered as `NULL`.
pub fn write_elements<T, W, E>(items: &[T], delims: Delimiters, mut write: W) -> Result<Vec<u8>, E>
where
    W: FnMut(&T, &mut Vec<u8>) -> Result<bool, E>,
{
    let mut out = vec![delims.open];
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push(delims.separator);
        }
        if !write(item, &mut out)? {
            out.extend_from_slice(NULL_TOKEN.as_bytes());
        }
    }
    out.push(delims.close);
    Ok(out)
}
