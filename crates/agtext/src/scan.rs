// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delimited-object scanner for property payloads.

use crate::error::{fragment, CodecError};

/// Length of the balanced `{...}` object at the start of `buf`.
///
/// Brace depth is tracked outside string literals only; inside a
/// double-quoted string a backslash escapes the next byte. The interior is
/// not validated as JSON, that is left to whoever decodes the span.
///
/// # Errors
///
/// [`CodecError::MalformedObject`] if `buf` does not start with `{` or ends
/// before the object closes (including an unterminated string).
pub fn object_len(buf: &[u8]) -> Result<usize, CodecError> {
    if buf.first() != Some(&b'{') {
        return Err(malformed(buf));
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (pos, &byte) in buf.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos + 1);
                }
            }
            _ => {}
        }
    }

    Err(malformed(buf))
}

fn malformed(buf: &[u8]) -> CodecError {
    CodecError::MalformedObject {
        fragment: fragment(buf),
    }
}
