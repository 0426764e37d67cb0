//! Bit-level reader with bounded operations.

use crate::error::{BitError, BitResult};

/// Bits kept buffered by [`BitReader::refill`].
pub const REFILL_BITS: u32 = 24;

/// An LSB-first bit reader with a rolling accumulator.
///
/// Input is pulled into the accumulator eight bits at a time by
/// [`refill`](Self::refill). [`peek`](Self::peek) exposes the low bits
/// without consuming them, which is what table-driven decoders need.
/// The reader never panics on malformed input.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    acc: u32,
    acc_bits: u32,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Returns the number of bits currently buffered in the accumulator.
    #[must_use]
    pub const fn bits_buffered(&self) -> u32 {
        self.acc_bits
    }

    /// Returns the number of bits left, buffered or not yet pulled in.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        (self.data.len() - self.pos) * 8 + self.acc_bits as usize
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Pulls whole input bytes into the accumulator until at least
    /// [`REFILL_BITS`] bits are buffered or the input is exhausted.
    pub fn refill(&mut self) {
        while self.acc_bits < REFILL_BITS {
            let Some(&byte) = self.data.get(self.pos) else {
                break;
            };
            self.acc |= u32::from(byte) << self.acc_bits;
            self.acc_bits += 8;
            self.pos += 1;
        }
    }

    /// Returns the low `bits` bits of the accumulator without consuming them.
    ///
    /// Bits beyond the buffered count read as zero.
    #[must_use]
    pub const fn peek(&self, bits: u32) -> u32 {
        if bits >= 32 {
            self.acc
        } else {
            self.acc & ((1u32 << bits) - 1)
        }
    }

    /// Drops `bits` buffered bits.
    pub fn consume(&mut self, bits: u32) -> BitResult<()> {
        if bits > self.acc_bits {
            return Err(BitError::UnexpectedEof {
                requested: bits as usize,
                available: self.acc_bits as usize,
            });
        }
        self.acc = if bits >= 32 { 0 } else { self.acc >> bits };
        self.acc_bits -= bits;
        Ok(())
    }

    /// Reads a single bit, refilling when the accumulator is empty.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        if self.acc_bits == 0 {
            self.refill();
        }
        let bit = self.peek(1) == 1;
        self.consume(1)?;
        Ok(bit)
    }

    /// Reads up to 24 bits as an unsigned integer, least significant first.
    pub fn read_bits(&mut self, bits: u32) -> BitResult<u32> {
        if bits > REFILL_BITS {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: REFILL_BITS,
            });
        }
        if self.acc_bits < bits {
            self.refill();
        }
        let value = self.peek(bits);
        self.consume(bits)?;
        Ok(value)
    }
}
