//! Per-session buffers for chunk coding.

use wire::Limits;

/// Buffers owned by one load or save session.
///
/// Sizes follow from the chunk limits: neither a compressed payload nor the
/// raw words of one chunk may exceed `max_chunk_bytes`. A chunk that decodes
/// past either bound is rejected. Nothing here is shared between sessions.
#[derive(Debug)]
pub(crate) struct ChunkScratch {
    /// Raw record words of the current chunk.
    pub(crate) words: Vec<i32>,
    /// Varint-packed bytes of the current chunk.
    pub(crate) packed: Vec<u8>,
    /// Huffman output while saving.
    pub(crate) compressed: Vec<u8>,
    /// Raw word budget of one chunk while saving.
    pub(crate) raw_capacity: usize,
}

impl ChunkScratch {
    /// Buffers for decoding chunks of at most `limits.max_chunk_bytes`.
    pub(crate) fn for_reading(limits: &Limits) -> Self {
        Self {
            words: vec![0; limits.max_chunk_bytes / 4],
            packed: vec![0; limits.max_chunk_bytes],
            compressed: Vec::new(),
            raw_capacity: 0,
        }
    }

    /// Buffers for building chunks of at most `limits.max_chunk_bytes`.
    pub(crate) fn for_writing(limits: &Limits) -> Self {
        let raw_capacity = limits.max_chunk_bytes / 4;
        Self {
            words: Vec::with_capacity(raw_capacity),
            packed: vec![0; limits.max_chunk_bytes],
            compressed: vec![0; limits.max_chunk_bytes * 2],
            raw_capacity,
        }
    }

    /// Returns how many more raw words fit before the chunk must be flushed.
    pub(crate) fn raw_space(&self) -> usize {
        self.raw_capacity.saturating_sub(self.words.len())
    }
}
