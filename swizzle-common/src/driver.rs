// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Image driver - sizes the image, builds the tables and moves every word
//! from the input buffer to its new slot in the output buffer.
//!
//! The run is strictly linear:
//! - work out the geometry from the image size
//! - parse the address and data tables
//! - allocate zeroed input and output buffers of the working size
//! - read the image into the input buffer (any padding stays zero)
//! - transform word by word into the output buffer
//! - write the whole output buffer
//!
//! Input and output are always separate buffers, as the address permutation
//! can move any word to any slot.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crate::advisory::Advisory;
use crate::config::SwizzleConfig;
use crate::error::{Result, SwizzleError};
use crate::geometry::ImageGeometry;
use crate::permutation::{Axis, PermutationTable};

/// What happened during a successful swizzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwizzleReport {
    pub geometry: ImageGeometry,
    pub advisories: Vec<Advisory>,
}

/// Geometry and tables for one image, ready to transform.
#[derive(Debug, Clone)]
pub struct SwizzlePlan {
    geometry: ImageGeometry,
    addr_table: Option<PermutationTable>,
    data_table: Option<PermutationTable>,
    advisories: Vec<Advisory>,
}

impl SwizzlePlan {
    pub fn new(file_size: u64, config: &SwizzleConfig) -> Result<Self> {
        let (geometry, mut advisories) =
            ImageGeometry::compute(file_size, config.word, config.address_permuted())?;

        let addr_table = config
            .addr_bits
            .as_deref()
            .map(|spec| {
                build_table(spec, geometry.addr_bits, Axis::Address, config, &mut advisories)
            })
            .transpose()?;
        let data_table = config
            .data_bits
            .as_deref()
            .map(|spec| build_table(spec, geometry.data_bits, Axis::Data, config, &mut advisories))
            .transpose()?;

        Ok(Self {
            geometry,
            addr_table,
            data_table,
            advisories,
        })
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    pub fn addr_table(&self) -> Option<&PermutationTable> {
        self.addr_table.as_ref()
    }

    pub fn data_table(&self) -> Option<&PermutationTable> {
        self.data_table.as_ref()
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Allocates zeroed input and output buffers of the working size.
    pub fn allocate(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let size = self.geometry.working_size;
        let total = size.saturating_mul(2);

        let input = zeroed_buffer(size).ok_or(SwizzleError::Allocation(total))?;
        let output = zeroed_buffer(size).ok_or(SwizzleError::Allocation(total))?;

        Ok((input, output))
    }

    /// Moves each word of `input` to its permuted slot in `output`,
    /// permuting its data bits on the way.  Both buffers must be exactly the
    /// working size.
    pub fn transform(&self, input: &[u8], output: &mut [u8]) {
        let word = self.geometry.word;
        let bytes_per_word = word.bytes_per_word() as usize;

        assert_eq!(input.len() as u64, self.geometry.working_size);
        assert_eq!(output.len(), input.len());

        for (index, source) in input.chunks_exact(bytes_per_word).enumerate() {
            // Which word slot does this word move to?
            let dest = match &self.addr_table {
                Some(table) => table.apply(index as u64) as usize,
                None => index,
            };

            let mut value = word.assemble(source);
            if let Some(table) = &self.data_table {
                value = table.apply(u64::from(value)) as u32;
            }

            let offset = dest * bytes_per_word;
            word.disassemble(value, &mut output[offset..offset + bytes_per_word]);
        }
    }

    fn into_report(self) -> SwizzleReport {
        SwizzleReport {
            geometry: self.geometry,
            advisories: self.advisories,
        }
    }
}

fn build_table(
    spec: &str,
    count: u32,
    axis: Axis,
    config: &SwizzleConfig,
    advisories: &mut Vec<Advisory>,
) -> Result<PermutationTable> {
    // Only a bijection can be inverted, so inverting implies strict
    let strict = config.strict || config.inverse;
    let (table, mut found) = PermutationTable::parse(spec, count, axis, strict)?;
    advisories.append(&mut found);

    if config.inverse {
        Ok(table
            .inverse()
            .expect("strictly parsed tables are always bijective"))
    } else {
        Ok(table)
    }
}

fn zeroed_buffer(size: u64) -> Option<Vec<u8>> {
    let len = usize::try_from(size).ok()?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(buf)
}

/// Swizzles an in-memory image, returning the (possibly padded) result.
pub fn swizzle_image(image: &[u8], config: &SwizzleConfig) -> Result<(Vec<u8>, SwizzleReport)> {
    let plan = SwizzlePlan::new(image.len() as u64, config)?;
    let (mut input, mut output) = plan.allocate()?;

    input[..image.len()].copy_from_slice(image);
    plan.transform(&input, &mut output);

    Ok((output, plan.into_report()))
}

/// Swizzles `in_path` into `out_path`.  The output file is only created once
/// the input has been read and transformed, so it may be the same file.
pub fn swizzle_file(
    in_path: &Path,
    out_path: &Path,
    config: &SwizzleConfig,
) -> Result<SwizzleReport> {
    let mut in_file = File::open(in_path).map_err(|e| SwizzleError::io("open", in_path, e))?;
    let file_size = in_file
        .metadata()
        .map_err(|e| SwizzleError::io("get size of", in_path, e))?
        .len();

    let plan = SwizzlePlan::new(file_size, config)?;
    let (mut input, mut output) = plan.allocate()?;

    read_image(&mut in_file, file_size, &mut input, in_path)?;
    drop(in_file);

    plan.transform(&input, &mut output);
    drop(input);

    write_image(out_path, &output)?;

    Ok(plan.into_report())
}

/// Writes a complete image to `path`, replacing any existing file.
pub fn write_image(path: &Path, data: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|e| SwizzleError::io("create", path, e))?;
    write_all(file, data, path)
}

// Reads `size` bytes into the front of `buf`, which keeps its length with
// everything past the image left zero.
fn read_image(reader: impl Read, size: u64, buf: &mut Vec<u8>, path: &Path) -> Result<()> {
    let len = buf.len();
    buf.clear();

    let read = reader
        .take(size)
        .read_to_end(buf)
        .map_err(|e| SwizzleError::io("read", path, e))? as u64;
    if read != size {
        return Err(SwizzleError::ShortRead {
            path: path.to_path_buf(),
            expected: size,
            read,
        });
    }

    buf.resize(len, 0);
    Ok(())
}

fn write_all(mut writer: impl Write, data: &[u8], path: &Path) -> Result<()> {
    writer
        .write_all(data)
        .and_then(|()| writer.flush())
        .map_err(|e| match e.kind() {
            ErrorKind::WriteZero => SwizzleError::ShortWrite {
                path: path.to_path_buf(),
                expected: data.len() as u64,
            },
            _ => SwizzleError::io("write", path, e),
        })
}
