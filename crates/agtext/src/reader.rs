// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Byte cursor used by the fixed header grammars.
//!
//! Matching is all-or-nothing: every method returns `None` on mismatch and the
//! caller abandons the cursor, so no backtracking state is kept here.

/// Forward-only cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a cursor positioned at `offset` (clamped to the slice length).
    pub(crate) fn at(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            offset: offset.min(bytes.len()),
        }
    }

    /// Bytes consumed from the start of the slice.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// Consume `byte` if it is next.
    pub(crate) fn eat(&mut self, byte: u8) -> Option<()> {
        if self.bytes.get(self.offset) == Some(&byte) {
            self.offset += 1;
            Some(())
        } else {
            None
        }
    }

    /// Consume a non-empty run of ASCII digits.
    fn digits(&mut self) -> Option<&'a [u8]> {
        let start = self.offset;
        let len = self.bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len == 0 {
            return None;
        }
        self.offset += len;
        Some(&self.bytes[start..self.offset])
    }

    /// Consume a `digits "." digits` graph id and return its text.
    pub(crate) fn graph_id(&mut self) -> Option<&'a [u8]> {
        let start = self.offset;
        self.digits()?;
        self.eat(b'.')?;
        self.digits()?;
        Some(&self.bytes[start..self.offset])
    }
}

/// Shortest non-empty label followed by a header tail.
///
/// Tries every `[` after the first byte, left to right, and returns the first
/// position where `tail` matches. Labels never span a newline. Returns the
/// label, the tail's captures, and the header length.
pub(crate) fn lazy_label<'a, T>(
    src: &'a [u8],
    mut tail: impl FnMut(&mut Reader<'a>) -> Option<T>,
) -> Option<(&'a [u8], T, usize)> {
    for pos in 1..src.len() {
        if src[pos - 1] == b'\n' {
            return None;
        }
        if src[pos] != b'[' {
            continue;
        }
        let mut reader = Reader::at(src, pos);
        if let Some(captures) = tail(&mut reader) {
            return Some((&src[..pos], captures, reader.offset()));
        }
    }
    None
}
