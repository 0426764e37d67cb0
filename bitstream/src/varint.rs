//! Sign-aware variable-length integer packing.
//!
//! Layout of one packed value:
//!
//! ```text
//! first byte:        [C][S][m5 m4 m3 m2 m1 m0]
//! continuation byte: [C][m6 .. m0]            (up to four of these)
//! ```
//!
//! `C` is the continuation flag and `S` the sign flag. Negative values are
//! complemented before packing, so `S` records that the magnitude bits hold
//! `!value`. A 32-bit value never needs more than [`MAX_PACKED_LEN`] bytes.

use crate::error::{BitError, BitResult};

/// Maximum number of bytes a single packed `i32` occupies.
pub const MAX_PACKED_LEN: usize = 5;

const CONTINUE: u8 = 0x80;
const SIGN: u8 = 0x40;
const FIRST_MASK: u8 = 0x3F;

// The fourth continuation byte only carries the top bits of a 31-bit magnitude.
const MASKS: [u8; 4] = [0x7F, 0x7F, 0x7F, 0x0F];
const SHIFTS: [u32; 4] = [6, 6 + 7, 6 + 7 + 7, 6 + 7 + 7 + 7];

/// Packs `value` into the front of `out`, returning the number of bytes used.
pub fn pack_i32(value: i32, out: &mut [u8]) -> BitResult<usize> {
    let capacity = out.len();
    let overflow = |attempted| BitError::BufferOverflow {
        attempted,
        capacity,
    };

    let (sign, mut magnitude) = if value < 0 {
        (SIGN, !value)
    } else {
        (0, value)
    };

    let first = out.first_mut().ok_or_else(|| overflow(1))?;
    *first = sign | (magnitude as u8 & FIRST_MASK);
    magnitude >>= 6;

    let mut len = 1;
    while magnitude != 0 {
        if len >= capacity {
            return Err(overflow(len + 1));
        }
        out[len - 1] |= CONTINUE;
        out[len] = magnitude as u8 & 0x7F;
        magnitude >>= 7;
        len += 1;
    }
    Ok(len)
}

/// Unpacks one value from the front of `src`, returning it with the number
/// of bytes consumed.
pub fn unpack_i32(src: &[u8]) -> BitResult<(i32, usize)> {
    let Some(&first) = src.first() else {
        return Err(BitError::UnexpectedEof {
            requested: 8,
            available: 0,
        });
    };

    let negative = first & SIGN != 0;
    let mut value = i32::from(first & FIRST_MASK);
    let mut pos = 0;

    for (mask, shift) in MASKS.iter().zip(SHIFTS) {
        if src[pos] & CONTINUE == 0 {
            break;
        }
        pos += 1;
        let Some(&byte) = src.get(pos) else {
            return Err(BitError::InvalidVarint);
        };
        value |= i32::from(byte & mask) << shift;
    }

    if negative {
        value = !value;
    }
    Ok((value, pos + 1))
}

/// Packs every word of `src` back to back into `out`.
///
/// Returns the total number of bytes written. Fails as a whole if any single
/// value does not fit.
pub fn pack_all(src: &[i32], out: &mut [u8]) -> BitResult<usize> {
    let mut offset = 0;
    for &value in src {
        let rest = out.get_mut(offset..).unwrap_or_default();
        offset += pack_i32(value, rest).map_err(|_| BitError::BufferOverflow {
            attempted: offset + packed_len(value),
            capacity: out.len(),
        })?;
    }
    Ok(offset)
}

/// Unpacks `src` completely into `out`, returning the number of words
/// produced.
///
/// Fails if the input ends inside a value or decodes to more words than
/// `out` holds.
pub fn unpack_all(src: &[u8], out: &mut [i32]) -> BitResult<usize> {
    let mut offset = 0;
    let mut count = 0;
    while offset < src.len() {
        let Some(slot) = out.get_mut(count) else {
            return Err(BitError::BufferOverflow {
                attempted: (count + 1) * 4,
                capacity: out.len() * 4,
            });
        };
        let (value, used) = unpack_i32(&src[offset..])?;
        *slot = value;
        offset += used;
        count += 1;
    }
    Ok(count)
}

/// Returns the packed size of `value` in bytes.
#[must_use]
pub const fn packed_len(value: i32) -> usize {
    let mut magnitude = if value < 0 { !value } else { value };
    magnitude >>= 6;
    let mut len = 1;
    while magnitude != 0 {
        magnitude >>= 7;
        len += 1;
    }
    len
}
