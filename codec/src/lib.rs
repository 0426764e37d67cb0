//! Ghost replay encoding and decoding.
//!
//! This is the main codec crate. It ties together bitstream and wire to load
//! and save ghost files: a fixed header followed by chunks of records, each
//! chunk delta coded, varint packed and Huffman compressed.
//!
//! # Features
//!
//! - Huffman compression with a fixed frequency table
//! - Record delta coding within a chunk
//! - Chunked record sessions for reading and writing
//! - Ghost load/save with versions 4 to 6
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **Bounded buffers** - Every session allocates from explicit limits.
//! - **Deterministic** - Same inputs produce same outputs.
//!
//! # Example
//!
//! ```no_run
//! use codec::{Character, Ghost};
//!
//! let mut ghost = Ghost::new();
//! ghost.set_metadata("nameless tee", "Tutorial", 12_340);
//! ghost.set_skin("default", false, 0, 0);
//! ghost.push_snapshot(Character { tick: 100, ..Character::default() })?;
//! ghost.save("run.gho")?;
//!
//! let loaded = Ghost::load("run.gho")?;
//! assert_eq!(loaded.num_ticks(), 1);
//! # Ok::<(), codec::CodecError>(())
//! ```

mod delta;
mod error;
mod ghost;
mod huffman;
mod limits;
mod path;
mod scratch;
mod session;
mod types;

pub use delta::{diff, undiff};
pub use error::{CodecError, CodecResult, LimitKind};
pub use ghost::{decode_ghost, encode_ghost, load_ghost, save_ghost, Ghost};
pub use huffman::{Huffman, HuffmanError, EOF_SYMBOL, FREQUENCY_TABLE};
pub use limits::CodecLimits;
pub use path::{SnapshotPath, PATH_CHUNK_LEN};
pub use session::{ChunkReader, ChunkWriter};
pub use types::{
    Character, Skin, CHARACTER_NO_TICK_WORDS, CHARACTER_WORDS, NO_START_TICK, SKIN_NAME_LEN,
    SKIN_WORDS,
};
pub use wire::Limits as WireLimits;
