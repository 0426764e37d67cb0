//! Chunk framing for the record stream.
//!
//! After the file header, a ghost file is a flat sequence of chunks:
//!
//! ```text
//! [kind: u8][item_count: u8][payload_len: u16 BE][payload ...]
//! ```
//!
//! This module only frames chunks. The payload encoding (delta, varint,
//! Huffman) is handled by the codec crate.

use crate::error::{DecodeError, EncodeError, LimitKind, Section, WireResult};
use crate::limits::Limits;

/// Size of a chunk header in bytes.
pub const CHUNK_HEADER_SIZE: usize = 4;

/// Records grouped into one chunk before it is flushed.
pub const ITEMS_PER_CHUNK: usize = 50;

/// Upper bound on the raw size of one record in bytes.
pub const MAX_ITEM_BYTES: usize = 128;

/// Hard maximum for the compressed payload of one chunk.
pub const MAX_CHUNK_BYTES: usize = MAX_ITEM_BYTES * ITEMS_PER_CHUNK;

/// Kind tag shared by every record in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordKind {
    /// Player skin, stored once per file.
    Skin = 0,
    /// Character snapshot from files that did not store the tick.
    CharacterNoTick = 1,
    /// Character snapshot with its tick.
    Character = 2,
    /// Tick the recording started at.
    StartTick = 3,
}

impl RecordKind {
    /// Parses a record kind from a raw chunk tag.
    pub fn parse(tag: u8) -> WireResult<Self> {
        match tag {
            0 => Ok(Self::Skin),
            1 => Ok(Self::CharacterNoTick),
            2 => Ok(Self::Character),
            3 => Ok(Self::StartTick),
            _ => Err(DecodeError::UnknownRecordKind { tag }),
        }
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the number of 32-bit words in one record of this kind.
    #[must_use]
    pub const fn words(self) -> usize {
        match self {
            Self::Skin => 9,
            Self::CharacterNoTick => 11,
            Self::Character => 12,
            Self::StartTick => 1,
        }
    }

    /// Returns the raw size of one record of this kind in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        self.words() * 4
    }

    /// Returns `true` for the two character snapshot kinds.
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, Self::Character | Self::CharacterNoTick)
    }
}

/// Decoded chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub kind: RecordKind,
    pub item_count: u8,
    pub payload_len: u16,
}

impl ChunkHeader {
    /// Builds a header for a chunk about to be written, checking it against
    /// the same limits the decoder enforces.
    pub fn new(
        kind: RecordKind,
        item_count: usize,
        payload_len: usize,
        limits: &Limits,
    ) -> Result<Self, EncodeError> {
        if item_count == 0 || item_count > limits.max_items_per_chunk {
            return Err(EncodeError::LimitsExceeded {
                kind: LimitKind::ChunkItems,
                limit: limits.max_items_per_chunk,
                actual: item_count,
            });
        }
        if payload_len > limits.max_chunk_bytes {
            return Err(EncodeError::LimitsExceeded {
                kind: LimitKind::ChunkBytes,
                limit: limits.max_chunk_bytes,
                actual: payload_len,
            });
        }
        let item_count =
            u8::try_from(item_count).map_err(|_| EncodeError::LengthOverflow { length: item_count })?;
        let payload_len = u16::try_from(payload_len)
            .map_err(|_| EncodeError::LengthOverflow { length: payload_len })?;
        Ok(Self {
            kind,
            item_count,
            payload_len,
        })
    }
}

/// One framed chunk borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireChunk<'a> {
    pub header: ChunkHeader,
    pub payload: &'a [u8],
}

impl WireChunk<'_> {
    /// Returns the number of bytes this chunk occupies on disk.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CHUNK_HEADER_SIZE + self.payload.len()
    }
}

/// Decodes and validates a chunk header.
pub fn decode_chunk_header(buf: &[u8], limits: &Limits) -> WireResult<ChunkHeader> {
    if buf.len() < CHUNK_HEADER_SIZE {
        return Err(DecodeError::Truncated {
            section: Section::ChunkHeader,
            needed: CHUNK_HEADER_SIZE,
            available: buf.len(),
        });
    }

    let kind = RecordKind::parse(buf[0])?;

    let item_count = buf[1];
    if item_count == 0 {
        return Err(DecodeError::EmptyChunk);
    }
    if usize::from(item_count) > limits.max_items_per_chunk {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::ChunkItems,
            limit: limits.max_items_per_chunk,
            actual: usize::from(item_count),
        });
    }

    let payload_len = u16::from_be_bytes([buf[2], buf[3]]);
    if payload_len == 0 {
        return Err(DecodeError::InvalidChunkLength { length: 0 });
    }
    if usize::from(payload_len) > limits.max_chunk_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::ChunkBytes,
            limit: limits.max_chunk_bytes,
            actual: usize::from(payload_len),
        });
    }

    Ok(ChunkHeader {
        kind,
        item_count,
        payload_len,
    })
}

/// Encodes a chunk header into the provided output buffer.
pub fn encode_chunk_header(header: &ChunkHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if out.len() < CHUNK_HEADER_SIZE {
        return Err(EncodeError::BufferTooSmall {
            needed: CHUNK_HEADER_SIZE,
            available: out.len(),
        });
    }

    out[0] = header.kind.tag();
    out[1] = header.item_count;
    out[2..4].copy_from_slice(&header.payload_len.to_be_bytes());

    Ok(CHUNK_HEADER_SIZE)
}

/// Decodes the chunk at the front of `buf`.
///
/// Returns `Ok(None)` when `buf` is empty, which is the only clean way for
/// the chunk stream to end. A partial header or payload is an error.
pub fn decode_chunk<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<Option<WireChunk<'a>>> {
    if buf.is_empty() {
        return Ok(None);
    }

    let header = decode_chunk_header(buf, limits)?;
    let end = CHUNK_HEADER_SIZE + usize::from(header.payload_len);
    let Some(payload) = buf.get(CHUNK_HEADER_SIZE..end) else {
        return Err(DecodeError::Truncated {
            section: Section::ChunkPayload,
            needed: end,
            available: buf.len(),
        });
    };

    Ok(Some(WireChunk { header, payload }))
}

/// Splits a chunk stream into borrowed chunks.
pub fn decode_chunks<'a>(mut buf: &'a [u8], limits: &Limits) -> WireResult<Vec<WireChunk<'a>>> {
    let mut chunks = Vec::new();
    while let Some(chunk) = decode_chunk(buf, limits)? {
        buf = &buf[chunk.encoded_len()..];
        chunks.push(chunk);
    }
    Ok(chunks)
}
