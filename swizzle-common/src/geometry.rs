// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Word and image geometry.

use strum::Display;

use crate::advisory::Advisory;
use crate::error::{Result, SwizzleError};
use crate::permutation::MAX_TABLE_BITS;

/// Byte order used to combine a word's bytes into its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ByteOrder {
    #[default]
    #[strum(to_string = "little-endian")]
    Little,
    #[strum(to_string = "big-endian")]
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGeometry {
    bytes_per_word: u8,
    byte_order: ByteOrder,
}

impl Default for WordGeometry {
    fn default() -> Self {
        Self {
            bytes_per_word: 1,
            byte_order: ByteOrder::Little,
        }
    }
}

impl WordGeometry {
    pub const MAX_BYTES_PER_WORD: u8 = 4;

    pub fn new(bytes_per_word: i64, byte_order: ByteOrder) -> Result<Self> {
        if !(1..=i64::from(Self::MAX_BYTES_PER_WORD)).contains(&bytes_per_word) {
            return Err(SwizzleError::InvalidWordSize(bytes_per_word));
        }
        Ok(Self {
            bytes_per_word: bytes_per_word as u8,
            byte_order,
        })
    }

    pub fn bytes_per_word(&self) -> u8 {
        self.bytes_per_word
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Number of data lines - 8 per byte.
    pub fn data_bits(&self) -> u32 {
        8 * u32::from(self.bytes_per_word)
    }

    /// Combines one word's worth of bytes into its value.
    pub fn assemble(&self, bytes: &[u8]) -> u32 {
        debug_assert_eq!(bytes.len(), self.bytes_per_word as usize);

        let last = bytes.len() - 1;
        let mut value = 0;
        for (ii, &byte) in bytes.iter().enumerate() {
            let shift = match self.byte_order {
                ByteOrder::Little => 8 * ii,
                ByteOrder::Big => 8 * (last - ii),
            };
            value |= u32::from(byte) << shift;
        }
        value
    }

    /// Splits a value back into bytes, the reverse of [`Self::assemble`].
    pub fn disassemble(&self, value: u32, bytes: &mut [u8]) {
        debug_assert_eq!(bytes.len(), self.bytes_per_word as usize);

        let last = bytes.len() - 1;
        for (ii, byte) in bytes.iter_mut().enumerate() {
            let shift = match self.byte_order {
                ByteOrder::Little => 8 * ii,
                ByteOrder::Big => 8 * (last - ii),
            };
            *byte = (value >> shift) as u8;
        }
    }
}

/// Sizes derived from the image and word geometry.  Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    pub word: WordGeometry,

    /// Size of the image as supplied.
    pub file_size: u64,

    /// Size after padding - both buffers and the output are this big.
    pub working_size: u64,

    pub addr_bits: u32,
    pub data_bits: u32,
}

impl ImageGeometry {
    /// Works out the working size and bus widths for an image of `file_size`
    /// bytes.
    ///
    /// When the address lines are being permuted every combination of
    /// address bits must select a real word, so the image is padded to a
    /// power of two.  It is then padded to a whole number of words.
    ///
    /// A power of two byte count is never a whole number of 3 byte words, so
    /// for those the word count is padded to a power of two instead.
    pub fn compute(
        file_size: u64,
        word: WordGeometry,
        address_permuted: bool,
    ) -> Result<(Self, Vec<Advisory>)> {
        let mut advisories = Vec::new();
        let mut working_size = file_size;
        let bytes_per_word = u64::from(word.bytes_per_word());

        if address_permuted
            && bytes_per_word.is_power_of_two()
            && working_size != 0
            && !working_size.is_power_of_two()
        {
            let padded_size = working_size
                .checked_next_power_of_two()
                .ok_or(SwizzleError::InvalidAddressWidth { size: file_size })?;
            advisories.push(Advisory::NonPowerOfTwoSize {
                size: working_size,
                padded_size,
            });
            working_size = padded_size;
        }

        if working_size % bytes_per_word != 0 {
            let padded_size = working_size.next_multiple_of(bytes_per_word);
            advisories.push(Advisory::UnalignedSize {
                size: working_size,
                bytes_per_word: word.bytes_per_word(),
                padded_size,
            });
            working_size = padded_size;
        }

        let mut geometry = Self {
            word,
            file_size,
            working_size,
            addr_bits: 0,
            data_bits: word.data_bits(),
        };

        let words = geometry.word_count();
        if address_permuted && words != 0 && !words.is_power_of_two() {
            let padded_words = words
                .checked_next_power_of_two()
                .ok_or(SwizzleError::InvalidAddressWidth { size: working_size })?;
            let padded_size = padded_words
                .checked_mul(bytes_per_word)
                .ok_or(SwizzleError::InvalidAddressWidth { size: working_size })?;
            advisories.push(Advisory::NonPowerOfTwoWords {
                words,
                padded_words,
                padded_size,
            });
            geometry.working_size = padded_size;
        }

        geometry.addr_bits = match geometry.word_count().checked_ilog2() {
            Some(bits) if (1..=MAX_TABLE_BITS).contains(&bits) => bits,
            _ => {
                return Err(SwizzleError::InvalidAddressWidth {
                    size: geometry.working_size,
                });
            }
        };

        log::debug!(
            "Image geometry: {} -> {} bytes, {} byte {} words, {} address bits, {} data bits",
            file_size,
            geometry.working_size,
            word.bytes_per_word(),
            word.byte_order(),
            geometry.addr_bits,
            geometry.data_bits
        );

        Ok((geometry, advisories))
    }

    /// Number of words in the working image.
    pub fn word_count(&self) -> u64 {
        self.working_size / u64::from(self.word.bytes_per_word())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(bytes_per_word: i64, byte_order: ByteOrder) -> WordGeometry {
        WordGeometry::new(bytes_per_word, byte_order).unwrap()
    }

    #[test]
    fn test_word_size_range() {
        assert!(WordGeometry::new(1, ByteOrder::Little).is_ok());
        assert!(WordGeometry::new(4, ByteOrder::Big).is_ok());
        assert!(matches!(
            WordGeometry::new(0, ByteOrder::Little),
            Err(SwizzleError::InvalidWordSize(0))
        ));
        assert!(matches!(
            WordGeometry::new(5, ByteOrder::Little),
            Err(SwizzleError::InvalidWordSize(5))
        ));
    }

    #[test]
    fn test_assemble_endianness() {
        assert_eq!(word(2, ByteOrder::Big).assemble(&[0x12, 0x34]), 0x1234);
        assert_eq!(word(2, ByteOrder::Little).assemble(&[0x12, 0x34]), 0x3412);
        assert_eq!(
            word(4, ByteOrder::Big).assemble(&[0xDE, 0xAD, 0xBE, 0xEF]),
            0xDEAD_BEEF
        );
        assert_eq!(
            word(3, ByteOrder::Little).assemble(&[0x01, 0x02, 0x03]),
            0x03_0201
        );
    }

    #[test]
    fn test_disassemble_endianness() {
        let mut bytes = [0; 2];
        word(2, ByteOrder::Big).disassemble(0x1234, &mut bytes);
        assert_eq!(bytes, [0x12, 0x34]);
        word(2, ByteOrder::Little).disassemble(0x1234, &mut bytes);
        assert_eq!(bytes, [0x34, 0x12]);

        let mut bytes = [0; 3];
        word(3, ByteOrder::Big).disassemble(0x0A0B0C, &mut bytes);
        assert_eq!(bytes, [0x0A, 0x0B, 0x0C]);
    }

    #[test]
    fn test_pad_to_power_of_two() {
        let (geometry, advisories) = ImageGeometry::compute(100, WordGeometry::default(), true).unwrap();
        assert_eq!(geometry.file_size, 100);
        assert_eq!(geometry.working_size, 128);
        assert_eq!(geometry.addr_bits, 7);
        assert_eq!(geometry.data_bits, 8);
        assert_eq!(
            advisories,
            vec![Advisory::NonPowerOfTwoSize {
                size: 100,
                padded_size: 128
            }]
        );
    }

    #[test]
    fn test_no_power_of_two_without_address() {
        let (geometry, advisories) =
            ImageGeometry::compute(100, WordGeometry::default(), false).unwrap();
        assert_eq!(geometry.working_size, 100);
        assert_eq!(geometry.addr_bits, 6);
        assert!(advisories.is_empty());
    }

    #[test]
    fn test_pad_to_word() {
        let (geometry, advisories) =
            ImageGeometry::compute(101, word(2, ByteOrder::Little), false).unwrap();
        assert_eq!(geometry.working_size, 102);
        assert_eq!(geometry.word_count(), 51);
        assert_eq!(geometry.data_bits, 16);
        assert_eq!(
            advisories,
            vec![Advisory::UnalignedSize {
                size: 101,
                bytes_per_word: 2,
                padded_size: 102
            }]
        );
    }

    #[test]
    fn test_three_byte_words() {
        let (geometry, advisories) =
            ImageGeometry::compute(100, word(3, ByteOrder::Little), true).unwrap();
        assert_eq!(geometry.working_size, 192);
        assert_eq!(geometry.word_count(), 64);
        assert_eq!(geometry.addr_bits, 6);
        assert_eq!(
            advisories,
            vec![
                Advisory::UnalignedSize {
                    size: 100,
                    bytes_per_word: 3,
                    padded_size: 102
                },
                Advisory::NonPowerOfTwoWords {
                    words: 34,
                    padded_words: 64,
                    padded_size: 192
                }
            ]
        );
    }

    #[test]
    fn test_three_byte_words_every_word_addressable() {
        for file_size in [96, 99, 384, 1000] {
            let (geometry, _) =
                ImageGeometry::compute(file_size, word(3, ByteOrder::Big), true).unwrap();
            assert!(geometry.word_count().is_power_of_two());
            assert_eq!(geometry.word_count(), 1 << geometry.addr_bits);
            assert!(geometry.working_size >= file_size);
        }

        // 32 words already, nothing to pad
        let (geometry, advisories) =
            ImageGeometry::compute(96, word(3, ByteOrder::Big), true).unwrap();
        assert_eq!(geometry.working_size, 96);
        assert_eq!(geometry.addr_bits, 5);
        assert!(advisories.is_empty());
    }

    #[test]
    fn test_address_width_limits() {
        assert!(matches!(
            ImageGeometry::compute(0, WordGeometry::default(), true),
            Err(SwizzleError::InvalidAddressWidth { size: 0 })
        ));
        assert!(matches!(
            ImageGeometry::compute(1, WordGeometry::default(), false),
            Err(SwizzleError::InvalidAddressWidth { size: 1 })
        ));
        assert!(matches!(
            ImageGeometry::compute(4, word(4, ByteOrder::Little), false),
            Err(SwizzleError::InvalidAddressWidth { size: 4 })
        ));

        let (geometry, _) = ImageGeometry::compute(1 << 34, word(4, ByteOrder::Little), true).unwrap();
        assert_eq!(geometry.addr_bits, 32);
        assert!(ImageGeometry::compute(1 << 33, WordGeometry::default(), true).is_err());
    }
}
