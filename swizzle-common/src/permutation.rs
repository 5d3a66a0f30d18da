// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Permutation tables and the bit permutation engine.
//!
//! A table maps each destination bit position to the source bit that lands
//! there.  Bit specs on the command line are written most significant
//! position first, so for an 8 bit table the spec
//!
//! ```text
//! 0,1,2,3,4,5,6,7
//! ```
//!
//! puts source bit 0 in destination bit 7, source bit 1 in destination bit 6,
//! and so on - i.e. it reverses the bits.

use static_assertions::const_assert;
use std::num::IntErrorKind;
use strum::Display;

use crate::advisory::Advisory;
use crate::error::{Result, SwizzleError};

/// Widest table supported - both the address bus and a 4 byte word top out
/// at 32 bits.
pub const MAX_TABLE_BITS: u32 = 32;

// The seen-index mask and the engine both work in a u64.
const_assert!(MAX_TABLE_BITS <= u64::BITS);

/// Which set of lines a table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    Address,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    // sources[dest] = source bit index
    sources: Vec<u32>,
}

impl PermutationTable {
    /// Table which leaves every bit where it is, or `None` if `count` is
    /// wider than [`MAX_TABLE_BITS`].
    pub fn identity(count: u32) -> Option<Self> {
        (count <= MAX_TABLE_BITS).then(|| Self {
            sources: (0..count).collect(),
        })
    }

    /// Parses a comma separated, most significant first, bit spec into a
    /// table of exactly `count` entries.
    ///
    /// Empty tokens (e.g. a trailing comma) are skipped.  The token count is
    /// checked before any index, so a spec that is simply too long reports
    /// that rather than whichever index happens to be out of range.
    ///
    /// Repeated indexes are returned as [`Advisory::DuplicateIndex`] unless
    /// `strict` is set, in which case they are fatal.  Indexes too large to
    /// hold in an `i64` are out of range like any other.
    pub fn parse(
        spec: &str,
        count: u32,
        axis: Axis,
        strict: bool,
    ) -> Result<(Self, Vec<Advisory>)> {
        if count > MAX_TABLE_BITS {
            return Err(SwizzleError::TableTooWide {
                axis,
                count,
                max: MAX_TABLE_BITS,
            });
        }

        let tokens = spec
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| parse_index(token, axis).map(|index| (token, index)))
            .collect::<Result<Vec<(&str, i64)>>>()?;

        if tokens.len() != count as usize {
            return Err(SwizzleError::TokenCountMismatch {
                axis,
                expected: count,
                found: tokens.len(),
            });
        }

        let mut sources = vec![0; count as usize];
        let mut advisories = Vec::new();
        let mut seen: u64 = 0;

        // First token is the most significant destination bit.
        for (dest, &(token, index)) in (0..count as usize).rev().zip(tokens.iter()) {
            if index < 0 || index >= i64::from(count) {
                return Err(SwizzleError::OutOfRangeIndex {
                    axis,
                    index,
                    token: token.to_string(),
                    max: count - 1,
                });
            }
            let index = index as u32;

            if seen & (1 << index) != 0 {
                if strict {
                    return Err(SwizzleError::DuplicateIndex { axis, index });
                }
                advisories.push(Advisory::DuplicateIndex { axis, index });
            }
            seen |= 1 << index;

            sources[dest] = index;
        }

        log::debug!("Parsed {} bit table (dest 0 first): {:?}", axis, sources);

        Ok((Self { sources }, advisories))
    }

    /// Source bit index for each destination bit, destination 0 first.
    pub fn sources(&self) -> &[u32] {
        &self.sources
    }

    /// True if every source bit is used exactly once.
    pub fn is_bijective(&self) -> bool {
        let mut seen: u64 = 0;
        for &src in &self.sources {
            if seen & (1 << src) != 0 {
                return false;
            }
            seen |= 1 << src;
        }
        true
    }

    /// The table that undoes this one, or `None` if this table drops or
    /// duplicates bits and so cannot be undone.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_bijective() {
            return None;
        }
        let mut sources = vec![0; self.sources.len()];
        for (dest, &src) in self.sources.iter().enumerate() {
            sources[src as usize] = dest as u32;
        }
        Some(Self { sources })
    }

    /// Gathers the bits of `value` into their new positions.  Bits above the
    /// table width are discarded.
    pub fn apply(&self, value: u64) -> u64 {
        let mut out = 0;

        for (dest, &src) in self.sources.iter().enumerate() {
            let dest = dest as u32;
            let bit = value & (1 << src);

            // Move the source bit down or up into its destination slot
            if src >= dest {
                out |= bit >> (src - dest);
            } else {
                out |= bit << (dest - src);
            }
        }

        out
    }
}

// Decimal index, saturated to the i64 limits if too long to fit so that it
// is reported as out of range rather than not a number.
fn parse_index(token: &str, axis: Axis) -> Result<i64> {
    token.parse::<i64>().or_else(|e| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(SwizzleError::InvalidIndex {
            axis,
            token: token.to_string(),
        }),
    })
}
