//! Wire framing for twghost replay files.
//!
//! This crate handles the binary container format: the fixed-size file
//! header, chunk framing and limit enforcement. It does not know how chunk
//! payloads are compressed or what the records mean, only where they are.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Versions 4 through 6 stay readable; only 6 is written.
//! - **Bounded decoding** - All length fields are validated against limits before use.
//! - **No domain knowledge** - This crate handles framing, not replay semantics.
//!
//! # Layout
//!
//! ```text
//! [file header: 101 bytes (v4, v5) or 133 bytes (v6)]
//! [chunk header: 4 bytes][compressed payload]
//! [chunk header: 4 bytes][compressed payload]
//! ...
//! ```

mod chunk;
mod error;
mod header;
mod limits;

pub use chunk::{
    decode_chunk, decode_chunk_header, decode_chunks, encode_chunk_header, ChunkHeader,
    RecordKind, WireChunk, CHUNK_HEADER_SIZE, ITEMS_PER_CHUNK, MAX_CHUNK_BYTES, MAX_ITEM_BYTES,
};
pub use error::{DecodeError, EncodeError, LimitKind, NameField, Section, WireResult};
pub use header::{
    decode_file_header, encode_file_header, header_len, truncate_str, FileHeader, HEADER_SIZE,
    LEGACY_HEADER_SIZE, MAP_HASH_LEN, MAP_HASH_VERSION, MAP_LEN, MARKER, MIN_VERSION, OWNER_LEN,
    VERSION,
};
pub use limits::Limits;
