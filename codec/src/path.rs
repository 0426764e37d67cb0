//! Chunked storage for character snapshots.

use crate::error::{CodecError, CodecResult};
use crate::types::Character;

/// Snapshots per storage chunk (thirty seconds at 50 ticks per second).
pub const PATH_CHUNK_LEN: usize = 25 * 60;

/// Ordered sequence of character snapshots, one per recorded tick.
///
/// Entries live in fixed-capacity chunks allocated on demand, so growing a
/// long recording never moves the snapshots already stored. Index `i` lives
/// in chunk `i / PATH_CHUNK_LEN` at offset `i % PATH_CHUNK_LEN`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPath {
    chunks: Vec<Box<[Character]>>,
    len: usize,
}

impl SnapshotPath {
    /// Creates an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Creates a path of `len` zeroed snapshots.
    ///
    /// Reports [`CodecError::AllocationFailed`] instead of aborting when the
    /// allocator refuses.
    pub fn with_len(len: usize) -> CodecResult<Self> {
        let failed = |_| CodecError::AllocationFailed { ticks: len };
        let num_chunks = len.div_ceil(PATH_CHUNK_LEN);

        let mut chunks = Vec::new();
        chunks.try_reserve_exact(num_chunks).map_err(failed)?;
        for _ in 0..num_chunks {
            chunks.push(alloc_chunk().map_err(failed)?);
        }
        Ok(Self { chunks, len })
    }

    /// Returns the number of snapshots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the path holds no snapshots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the snapshot at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Character> {
        if index >= self.len {
            return None;
        }
        self.chunks
            .get(index / PATH_CHUNK_LEN)
            .and_then(|chunk| chunk.get(index % PATH_CHUNK_LEN))
    }

    /// Returns the snapshot at `index` mutably, or `None` if out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Character> {
        if index >= self.len {
            return None;
        }
        self.chunks
            .get_mut(index / PATH_CHUNK_LEN)
            .and_then(|chunk| chunk.get_mut(index % PATH_CHUNK_LEN))
    }

    /// Appends a snapshot, allocating a new chunk when the last one is full.
    pub fn push(&mut self, snapshot: Character) -> CodecResult<()> {
        let offset = self.len % PATH_CHUNK_LEN;
        if offset == 0 && self.len / PATH_CHUNK_LEN == self.chunks.len() {
            let ticks = self.len + 1;
            let failed = |_| CodecError::AllocationFailed { ticks };
            self.chunks.try_reserve(1).map_err(failed)?;
            let chunk = alloc_chunk().map_err(failed)?;
            self.chunks.push(chunk);
        }

        let index = self.len;
        self.len += 1;
        if let Some(slot) = self.get_mut(index) {
            *slot = snapshot;
        }
        Ok(())
    }

    /// Iterates over the snapshots in order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> + '_ {
        self.chunks.iter().flat_map(|chunk| chunk.iter()).take(self.len)
    }

    /// Iterates mutably over the snapshots in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> + '_ {
        let len = self.len;
        self.chunks
            .iter_mut()
            .flat_map(|chunk| chunk.iter_mut())
            .take(len)
    }

    /// Drops every snapshot and releases all chunks.
    pub fn clear(&mut self) {
        self.chunks = Vec::new();
        self.len = 0;
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }
}

impl PartialEq for SnapshotPath {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for SnapshotPath {}

fn alloc_chunk() -> Result<Box<[Character]>, std::collections::TryReserveError> {
    let mut chunk = Vec::new();
    chunk.try_reserve_exact(PATH_CHUNK_LEN)?;
    chunk.resize(PATH_CHUNK_LEN, Character::default());
    Ok(chunk.into_boxed_slice())
}
