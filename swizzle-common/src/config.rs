// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Run configuration and JSON swizzle profiles.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, SwizzleError};
use crate::geometry::WordGeometry;

/// Everything needed to swizzle an image.  Built once, never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwizzleConfig {
    /// Address bit spec, most significant first.  `None` leaves the word
    /// order alone.
    pub addr_bits: Option<String>,

    /// Data bit spec, most significant first.  `None` leaves each word's
    /// bits alone.
    pub data_bits: Option<String>,

    pub word: WordGeometry,

    /// Reject repeated bit indexes rather than warning about them.
    pub strict: bool,

    /// Apply the inverse of each table, undoing a previous swizzle.
    pub inverse: bool,
}

impl SwizzleConfig {
    pub fn address_permuted(&self) -> bool {
        self.addr_bits.is_some()
    }

    pub fn data_permuted(&self) -> bool {
        self.data_bits.is_some()
    }
}

/// A saved set of swizzle options, typically describing one board's wiring.
///
/// ```json
/// {
///     "addr": "12,11,10,9,8,0,1,2,3,4,5,6,7",
///     "data": "0,1,2,3,4,5,6,7",
///     "word": 1,
///     "big_endian": false
/// }
/// ```
///
/// All fields are optional.  Command line options take precedence, and
/// `--little` / `--no-strict` turn off the profile's switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub addr: Option<String>,
    pub data: Option<String>,
    pub word: Option<i64>,
    pub big_endian: Option<bool>,
    pub strict: Option<bool>,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SwizzleError::Profile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| SwizzleError::Profile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
