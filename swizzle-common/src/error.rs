// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Fatal error conditions.  Every variant aborts the whole run - there is no
//! partial output and nothing to resume from.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::permutation::Axis;

pub type Result<T> = std::result::Result<T, SwizzleError>;

#[derive(Debug, Error)]
pub enum SwizzleError {
    // `index` saturates at the i64 limits, `token` is what was written
    #[error("invalid {axis} bit index {token} (must be between 0 and {max})")]
    OutOfRangeIndex {
        axis: Axis,
        index: i64,
        token: String,
        max: u32,
    },

    #[error("invalid {axis} bit index '{token}' (not a decimal number)")]
    InvalidIndex { axis: Axis, token: String },

    #[error("expected {expected} {axis} bits, but {found} were specified")]
    TokenCountMismatch {
        axis: Axis,
        expected: u32,
        found: usize,
    },

    #[error("{axis} bit index {index} specified multiple times")]
    DuplicateIndex { axis: Axis, index: u32 },

    #[error("{axis} bus width of {count} bits is wider than the maximum of {max}")]
    TableTooWide { axis: Axis, count: u32, max: u32 },

    #[error("bytes per word must be between 1-4, got {0}")]
    InvalidWordSize(i64),

    #[error("address bus width must be between 1 and 32 bits (image is {size} bytes)")]
    InvalidAddressWidth { size: u64 },

    #[error("unable to {op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {expected} bytes from {} (got {read})", path.display())]
    ShortRead {
        path: PathBuf,
        expected: u64,
        read: u64,
    },

    #[error("unable to write {expected} bytes to {}", path.display())]
    ShortWrite { path: PathBuf, expected: u64 },

    #[error("unable to allocate {0} bytes")]
    Allocation(u64),

    #[error("invalid profile {}: {reason}", path.display())]
    Profile { path: PathBuf, reason: String },
}

impl SwizzleError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SwizzleError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
