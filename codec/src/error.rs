//! Error types for codec operations.

use std::fmt;
use std::io;

use crate::huffman::HuffmanError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while loading or saving a ghost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// File or chunk framing error.
    Wire(wire::DecodeError),

    /// Header or chunk framing could not be written.
    Encode(wire::EncodeError),

    /// Varint stage failed.
    Bitstream(bitstream::BitError),

    /// Huffman stage failed.
    Huffman(HuffmanError),

    /// A chunk holds fewer words than its item count promises.
    NotEnoughData {
        kind: wire::RecordKind,
        needed: usize,
        available: usize,
    },

    /// A record was requested where no chunk has one left.
    NoPendingRecord,

    /// Record buffer does not match the size of its kind.
    RecordSize {
        kind: wire::RecordKind,
        expected: usize,
        found: usize,
    },

    /// Character records do not match the declared tick count.
    RecordCountMismatch { expected: usize, found: usize },

    /// The snapshot path could not be allocated.
    AllocationFailed { ticks: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Reading or writing the underlying file failed.
    Io { kind: io::ErrorKind, message: String },
}

impl CodecError {
    /// Returns `true` if a chunk payload failed to decode.
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Self::Huffman(_) | Self::Bitstream(_) | Self::NotEnoughData { .. }
        )
    }

    /// Returns `true` for rejections of the file header's contents.
    #[must_use]
    pub const fn is_malformed_header(&self) -> bool {
        match self {
            Self::Wire(e) => e.is_malformed_header(),
            _ => false,
        }
    }

    /// Returns `true` if the input ended early.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        match self {
            Self::Wire(e) => e.is_truncated(),
            _ => false,
        }
    }
}

/// Specific codec limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Ticks,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::Bitstream(e) => write!(f, "intpack error: {e}"),
            Self::Huffman(e) => write!(f, "decompression error: {e}"),
            Self::NotEnoughData {
                kind,
                needed,
                available,
            } => {
                write!(
                    f,
                    "not enough data for {kind:?} record: need {needed} words, have {available}"
                )
            }
            Self::NoPendingRecord => write!(f, "no record left in the current chunk"),
            Self::RecordSize {
                kind,
                expected,
                found,
            } => {
                write!(f, "{kind:?} record has {expected} words, got {found}")
            }
            Self::RecordCountMismatch { expected, found } => {
                write!(
                    f,
                    "failed to read all ghost data: got {found} ticks, wanted {expected}"
                )
            }
            Self::AllocationFailed { ticks } => {
                write!(f, "failed to allocate path for {ticks} ticks")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Io { kind, message } => write!(f, "io error ({kind:?}): {message}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ticks => "ticks",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            Self::Huffman(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<HuffmanError> for CodecError {
    fn from(err: HuffmanError) -> Self {
        Self::Huffman(err)
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
