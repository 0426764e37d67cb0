//! Bit-level writer for encoding packed binary data.

use crate::error::{BitError, BitResult};

/// Widest single write accepted by [`BitWriter::write_bits`].
pub const MAX_WRITE_BITS: u32 = 24;

/// A bounded, LSB-first bit writer over a caller-provided buffer.
///
/// Bits fill each output byte starting at the least significant bit. Complete
/// bytes are flushed to the buffer as soon as they fill; the partial byte is
/// emitted by [`finish`](Self::finish).
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    /// Pending bits not yet flushed (always fewer than 8 between writes).
    acc: u32,
    acc_bits: u32,
}

impl<'a> BitWriter<'a> {
    /// Creates a new `BitWriter` writing into `buf`.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.len * 8 + self.acc_bits as usize
    }

    /// Returns the number of complete bytes flushed so far.
    #[must_use]
    pub const fn bytes_written(&self) -> usize {
        self.len
    }

    /// Returns the capacity of the destination buffer in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Writes the low `bits` bits of `value`, least significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 24`,
    /// [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`, and
    /// [`BitError::BufferOverflow`] if a completed byte does not fit.
    pub fn write_bits(&mut self, value: u32, bits: u32) -> BitResult<()> {
        if bits > MAX_WRITE_BITS {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: MAX_WRITE_BITS,
            });
        }
        if value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }

        self.acc |= value << self.acc_bits;
        self.acc_bits += bits;
        while self.acc_bits >= 8 {
            self.push_byte((self.acc & 0xFF) as u8)?;
            self.acc >>= 8;
            self.acc_bits -= 8;
        }
        Ok(())
    }

    /// Finishes writing and returns the number of bytes used.
    ///
    /// The pending accumulator byte is always emitted, zero-padded in its
    /// high bits, even when no bits are pending. Decoders rely on that
    /// trailing byte as lookahead after the final code.
    pub fn finish(mut self) -> BitResult<usize> {
        self.push_byte((self.acc & 0xFF) as u8)?;
        Ok(self.len)
    }

    fn push_byte(&mut self, byte: u8) -> BitResult<()> {
        let Some(slot) = self.buf.get_mut(self.len) else {
            return Err(BitError::BufferOverflow {
                attempted: self.len + 1,
                capacity: self.buf.len(),
            });
        };
        *slot = byte;
        self.len += 1;
        Ok(())
    }
}
