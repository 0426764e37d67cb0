//! Low-level bit packing primitives for the twghost codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for LSB-first
//! bit-level encoding and decoding, plus the sign-aware [`varint`] packer
//! that shapes integer records before entropy coding.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Writers target caller-provided buffers and
//!   report overflow instead of growing.
//! - **No domain knowledge** - This crate knows nothing about ghosts, chunks or records.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut buf = [0u8; 4];
//! let mut writer = BitWriter::new(&mut buf);
//! writer.write_bits(1, 1).unwrap();
//! writer.write_bits(42, 7).unwrap();
//! let used = writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(&buf[..used]);
//! assert_eq!(reader.read_bits(1).unwrap(), 1);
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! ```

mod error;
mod reader;
mod writer;

pub mod varint;

pub use error::{BitError, BitResult};
pub use reader::{BitReader, REFILL_BITS};
pub use writer::{BitWriter, MAX_WRITE_BITS};
