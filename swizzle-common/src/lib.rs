// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! swizzle-common
//!
//! Remaps the address and/or data lines of a ROM image, emulating a ROM
//! whose pins are wired in a different order than the image was dumped or
//! will be programmed with.
//!
//! Two independent permutations are applied in a single pass:
//! - the address permutation decides which word slot each word moves to
//! - the data permutation reorders the bits within each word
//!
//! Typically used like this:
//!
//! ```rust ignore
//! use swizzle_common::{swizzle_file, SwizzleConfig};
//!
//! let config = SwizzleConfig {
//!     data_bits: Some("0,1,2,3,4,5,6,7".to_string()),
//!     ..Default::default()
//! };
//! let report = swizzle_file(in_path, out_path, &config)?;
//! for advisory in &report.advisories {
//!     eprintln!("warning: {}", advisory);
//! }
//! ```
//!
//! Nothing in this crate writes to the console or exits the process.
//! Geometry and table decisions are traced via the `log` crate.

pub mod advisory;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod permutation;

pub use advisory::Advisory;
pub use config::{Profile, SwizzleConfig};
pub use driver::{SwizzlePlan, SwizzleReport, swizzle_file, swizzle_image, write_image};
pub use error::{Result, SwizzleError};
pub use geometry::{ByteOrder, ImageGeometry, WordGeometry};
pub use permutation::{Axis, MAX_TABLE_BITS, PermutationTable};
