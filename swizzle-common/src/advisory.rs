// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use std::fmt;

use crate::permutation::Axis;

/// Non-fatal conditions raised while planning a swizzle.  The run carries on
/// with a deterministic fallback; the caller decides how to report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The same source bit was listed more than once for an axis.  The
    /// resulting table is not a bijection, so bits will be dropped or
    /// duplicated.
    DuplicateIndex { axis: Axis, index: u32 },

    /// Address permutation was requested on an image whose size is not a
    /// power of two.  The image is zero padded up to `padded_size`.
    NonPowerOfTwoSize { size: u64, padded_size: u64 },

    /// The image size is not a whole number of words.  The image is zero
    /// padded up to `padded_size`.
    UnalignedSize {
        size: u64,
        bytes_per_word: u8,
        padded_size: u64,
    },

    /// Address permutation was requested on an image whose word count is
    /// not a power of two, which only happens with 3 byte words.  The image
    /// is zero padded to `padded_words` words so every address selects its
    /// own word.
    NonPowerOfTwoWords {
        words: u64,
        padded_words: u64,
        padded_size: u64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::DuplicateIndex { axis, index } => {
                write!(f, "{} bit index {} specified multiple times", axis, index)
            }
            Advisory::NonPowerOfTwoSize { size, padded_size } => write!(
                f,
                "non-power-of-two input size ({} bytes), padding to {} bytes",
                size, padded_size
            ),
            Advisory::UnalignedSize {
                size,
                bytes_per_word,
                padded_size,
            } => write!(
                f,
                "input size ({} bytes) is not a multiple of {} bytes, padding to {} bytes",
                size, bytes_per_word, padded_size
            ),
            Advisory::NonPowerOfTwoWords {
                words,
                padded_words,
                padded_size,
            } => write!(
                f,
                "non-power-of-two word count ({} words), padding to {} words ({} bytes)",
                words, padded_words, padded_size
            ),
        }
    }
}
