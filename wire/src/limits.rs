//! Configurable limits for bounded chunk framing.

use crate::chunk::{ITEMS_PER_CHUNK, MAX_CHUNK_BYTES};

/// Wire-level limits for chunk framing.
///
/// These limits are enforced while reading chunk headers and while flushing
/// chunks, so that every buffer involved stays bounded. The defaults are the
/// values existing ghost files are written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum compressed payload length of a single chunk in bytes.
    pub max_chunk_bytes: usize,

    /// Maximum number of records grouped into one chunk.
    pub max_items_per_chunk: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_chunk_bytes: MAX_CHUNK_BYTES,
            max_items_per_chunk: ITEMS_PER_CHUNK,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_chunk_bytes: 1024,
            max_items_per_chunk: 8,
        }
    }

    /// Creates the widest limits the chunk header fields can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_chunk_bytes: u16::MAX as usize,
            max_items_per_chunk: u8::MAX as usize,
        }
    }
}
