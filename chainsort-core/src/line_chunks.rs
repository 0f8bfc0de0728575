//! Splitting driver input into bounded pieces.

use std::iter::FusedIterator;

/// Splits `line` into consecutive pieces of at most `width` characters.
///
/// Splits on `char` boundaries, never inside a code point. An empty line
/// yields nothing. A `width` of zero is treated as one.
pub fn line_chunks(line: &str, width: usize) -> LineChunks<'_> {
    LineChunks {
        rest: line,
        width: width.max(1),
    }
}

#[derive(Debug, Clone)]
pub struct LineChunks<'a> {
    rest: &'a str,
    width: usize,
}

impl<'a> Iterator for LineChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let split = self
            .rest
            .char_indices()
            .nth(self.width)
            .map_or(self.rest.len(), |(index, _)| index);
        let (chunk, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(chunk)
    }
}

impl FusedIterator for LineChunks<'_> {}
