//! Text chunking with fixed-size windows and exact character overlap

use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkMetadata};

/// Splits document text into overlapping chunks.
///
/// Chunk boundaries favor natural breaks (paragraph, then sentence, then
/// whitespace) scanned backward from the size limit, falling back to a hard
/// character cut. The next chunk always starts exactly `overlap` characters
/// before the previous chunk's end, so consecutive chunks share exactly
/// that many characters of context.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
}

impl ChunkSplitter {
    /// Create a new splitter. The overlap is capped below `chunk_size` so
    /// every step makes forward progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let overlap = if chunk_size == 0 {
            0
        } else {
            overlap.min(chunk_size - 1)
        };
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Create a splitter from the chunking configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split `text` into chunk slices.
    ///
    /// The returned iterator is lazy and pure: splitting the same text twice
    /// yields identical output. Empty text yields no chunks.
    pub fn split<'a>(&self, text: &'a str) -> Splits<'a> {
        // Byte offset of every char, with the text length as a sentinel, so
        // character arithmetic maps back to valid slice boundaries.
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());

        Splits {
            text,
            bounds,
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            cursor: 0,
        }
    }

    /// Split `text` and stamp each chunk with the given metadata.
    ///
    /// This is the only place chunk metadata is attached; it has no side
    /// effects beyond the returned chunks.
    pub fn chunk_document(&self, text: &str, metadata: &ChunkMetadata) -> Vec<Chunk> {
        self.split(text)
            .map(|piece| Chunk::new(piece.to_string(), metadata.clone()))
            .collect()
    }
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Lazy iterator over chunk slices of one text
pub struct Splits<'a> {
    text: &'a str,
    /// Byte offset of each char, plus `text.len()` as a final sentinel
    bounds: Vec<usize>,
    chunk_size: usize,
    overlap: usize,
    /// Char index where the next chunk starts
    cursor: usize,
}

impl<'a> Splits<'a> {
    fn char_count(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Pick the cut point (char index) for a window ending at `limit`,
    /// preferring a natural break in the latter half of the window.
    fn natural_cut(&self, start: usize, limit: usize) -> usize {
        // Only accept breaks past the window midpoint; a break earlier than
        // that would produce degenerate chunks.
        let mid = start + (limit - start) / 2;
        let window = &self.text[self.bounds[mid]..self.bounds[limit]];
        let base = self.bounds[mid];

        let cut_byte = Self::find_break(window).map(|offset| base + offset);

        match cut_byte {
            Some(byte) => self
                .bounds
                .binary_search(&byte)
                .unwrap_or_else(|insert_at| insert_at),
            None => limit,
        }
    }

    /// Byte offset just past the best natural break in `window`, if any
    fn find_break(window: &str) -> Option<usize> {
        // Paragraph break wins outright
        if let Some(pos) = window.rfind("\n\n") {
            return Some(pos + 2);
        }

        // Latest sentence terminator followed by whitespace
        let sentence = [". ", ".\n", "! ", "!\n", "? ", "?\n"]
            .iter()
            .filter_map(|pat| window.rfind(pat).map(|pos| pos + pat.len()))
            .max();
        if sentence.is_some() {
            return sentence;
        }

        if let Some(pos) = window.rfind('\n') {
            return Some(pos + 1);
        }

        window.rfind(' ').map(|pos| pos + 1)
    }
}

impl<'a> Iterator for Splits<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let total = self.char_count();
        if self.cursor >= total || self.chunk_size == 0 {
            return None;
        }

        let start = self.cursor;
        let limit = (start + self.chunk_size).min(total);
        let end = if limit == total {
            total
        } else {
            self.natural_cut(start, limit)
        };

        let piece = &self.text[self.bounds[start]..self.bounds[end]];

        self.cursor = if end == total {
            total
        } else {
            // Rewind exactly `overlap` chars; the max() keeps pathological
            // size/overlap combinations from stalling.
            end.saturating_sub(self.overlap).max(start + 1)
        };

        Some(piece)
    }
}
