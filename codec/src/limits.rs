//! Limits for codec-level decoding.

/// Codec-specific limits enforced while loading a ghost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum tick count a file header may declare. The snapshot path is
    /// allocated up front from this count.
    pub max_ticks: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        // One day of recording at 50 ticks per second.
        Self {
            max_ticks: 50 * 60 * 60 * 24,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self { max_ticks: 10_000 }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_ticks: usize::MAX,
        }
    }
}
