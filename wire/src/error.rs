//! Error types for wire format operations.

use std::fmt;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// High-level decode errors for file and chunk framing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Input ended before a complete structure could be read.
    Truncated {
        section: Section,
        needed: usize,
        available: usize,
    },

    /// The file does not start with the ghost marker.
    InvalidMarker { found: [u8; 8] },

    /// Unsupported file version.
    UnsupportedVersion { found: u8 },

    /// A fixed-width name field has no NUL terminator.
    UnterminatedName { field: NameField },

    /// Declared tick count is not positive.
    InvalidTickCount { found: i32 },

    /// Declared duration is not positive.
    InvalidDuration { found: i32 },

    /// Unknown record kind tag in a chunk header.
    UnknownRecordKind { tag: u8 },

    /// Chunk header declares zero items.
    EmptyChunk,

    /// Chunk header declares a zero-length payload.
    InvalidChunkLength { length: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

impl DecodeError {
    /// Returns `true` for rejections of the file header's contents.
    #[must_use]
    pub const fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            Self::InvalidMarker { .. }
                | Self::UnsupportedVersion { .. }
                | Self::UnterminatedName { .. }
                | Self::InvalidTickCount { .. }
                | Self::InvalidDuration { .. }
        )
    }

    /// Returns `true` if the input ended early.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Part of the file being read when input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    FileHeader,
    MapHash,
    ChunkHeader,
    ChunkPayload,
}

/// Fixed-width name fields of the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Owner,
    Map,
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    ChunkBytes,
    ChunkItems,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall { needed: usize, available: usize },
    LengthOverflow { length: usize },
    UnsupportedVersion { version: u8 },
    InvalidTickCount { found: i32 },
    InvalidDuration { found: i32 },
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                section,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated {section}: need {needed} bytes, have {available}"
                )
            }
            Self::InvalidMarker { found } => {
                write!(f, "invalid header marker: {found:02X?}")
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "ghost version {found} is not supported")
            }
            Self::UnterminatedName { field } => {
                write!(f, "{field} name is not terminated")
            }
            Self::InvalidTickCount { found } => {
                write!(f, "number of ticks {found} is invalid")
            }
            Self::InvalidDuration { found } => write!(f, "time {found} is invalid"),
            Self::UnknownRecordKind { tag } => write!(f, "unknown record kind: {tag}"),
            Self::EmptyChunk => write!(f, "chunk declares no items"),
            Self::InvalidChunkLength { length } => {
                write!(f, "invalid chunk payload length: {length}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileHeader => "file header",
            Self::MapHash => "map hash",
            Self::ChunkHeader => "chunk header",
            Self::ChunkPayload => "chunk payload",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "owner",
            Self::Map => "map",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChunkBytes => "chunk bytes",
            Self::ChunkItems => "chunk items",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
            Self::UnsupportedVersion { version } => {
                write!(f, "cannot write ghost version {version}")
            }
            Self::InvalidTickCount { found } => {
                write!(f, "cannot write {found} ticks, need at least one")
            }
            Self::InvalidDuration { found } => {
                write!(f, "cannot write time {found}, must be positive")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
