//! Error types for bitstream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level or varint encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Attempted to write more than the destination buffer can hold.
    BufferOverflow {
        /// Number of bytes the write needed.
        attempted: usize,
        /// Capacity of the destination in bytes.
        capacity: usize,
    },

    /// Invalid bit count for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: u32,
        /// Maximum allowed bits for this operation.
        max_bits: u32,
    },

    /// Value does not fit in the requested number of bits.
    ValueOutOfRange {
        /// The value that was out of range.
        value: u32,
        /// Number of bits available.
        bits: u32,
    },

    /// A varint continuation flag was set on the last available byte.
    InvalidVarint,
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => write!(f, "bitstream ended: need {requested} bits, have {available}"),
            Self::BufferOverflow {
                attempted,
                capacity,
            } => write!(
                f,
                "output full: {attempted} bytes do not fit in {capacity}"
            ),
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "cannot move {bits} bits at once (max {max_bits})")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "value {value:#x} is wider than {bits} bits")
            }
            Self::InvalidVarint => write!(f, "varint ends inside a continuation"),
        }
    }
}

impl std::error::Error for BitError {}
