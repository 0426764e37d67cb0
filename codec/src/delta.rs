//! Record delta coding.
//!
//! Consecutive records of the same kind are stored as the word-wise
//! difference from their predecessor. Arithmetic wraps modulo 2^32, which
//! makes [`undiff`] the exact inverse of [`diff`] for any input.

/// Writes `current - previous` into `out`, word by word.
///
/// All three slices must have the same length.
pub fn diff(previous: &[i32], current: &[i32], out: &mut [i32]) {
    debug_assert_eq!(previous.len(), current.len());
    debug_assert_eq!(previous.len(), out.len());
    for ((out, &past), &now) in out.iter_mut().zip(previous).zip(current) {
        *out = now.wrapping_sub(past);
    }
}

/// Writes `previous + delta` into `out`, word by word.
///
/// All three slices must have the same length.
pub fn undiff(previous: &[i32], delta: &[i32], out: &mut [i32]) {
    debug_assert_eq!(previous.len(), delta.len());
    debug_assert_eq!(previous.len(), out.len());
    for ((out, &past), &change) in out.iter_mut().zip(previous).zip(delta) {
        *out = past.wrapping_add(change);
    }
}
