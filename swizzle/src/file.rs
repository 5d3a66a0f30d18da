// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! swizzle - input acquisition.
//!
//! Local files are handed straight to the file driver.  URLs are downloaded
//! and zip archives unpacked into memory first.

use bytes::Bytes;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;
use urlencoding::decode;
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {source_name}")]
    Read {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to URL decode extract filename '{name}'")]
    Decode {
        name: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("failed to open zip archive {archive}")]
    Archive {
        archive: String,
        #[source]
        source: ZipError,
    },

    #[error("failed to find '{name}' in {archive} (archive contents: {})", contents.join(", "))]
    NotInArchive {
        name: String,
        archive: String,
        contents: Vec<String>,
    },

    #[error("failed to extract '{name}' from {archive}")]
    Extract {
        name: String,
        archive: String,
        #[source]
        source: io::Error,
    },
}

/// Where the image to swizzle lives.
#[derive(Debug)]
pub enum Input {
    File(PathBuf),
    Memory(Vec<u8>),
}

pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

pub fn load_input(in_path: &str, extract: Option<&str>) -> Result<Input, FetchError> {
    let raw = if is_url(in_path) {
        download(in_path)?
    } else if extract.is_some() {
        fs::read(in_path)
            .map(Bytes::from)
            .map_err(|source| FetchError::Read {
                source_name: in_path.to_string(),
                source,
            })?
    } else {
        return Ok(Input::File(PathBuf::from(in_path)));
    };

    match extract {
        Some(name) => extract_from_zip(raw, name, in_path).map(Input::Memory),
        None => Ok(Input::Memory(raw.to_vec())),
    }
}

fn download(url: &str) -> Result<Bytes, FetchError> {
    println!("- Downloading {}", url);

    let to_err = |source| FetchError::Download {
        url: url.to_string(),
        source,
    };

    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(to_err)?
        .bytes()
        .map_err(to_err)
}

/// Pulls `name` out of an in-memory zip archive.  `name` may be URL encoded,
/// as it often is when copied from a download link.
pub fn extract_from_zip(raw: Bytes, name: &str, archive: &str) -> Result<Vec<u8>, FetchError> {
    let decoded = decode(name).map_err(|source| FetchError::Decode {
        name: name.to_string(),
        source,
    })?;

    println!("- Extracting {} from {}", decoded, archive);

    let mut zip = ZipArchive::new(Cursor::new(raw)).map_err(|source| FetchError::Archive {
        archive: archive.to_string(),
        source,
    })?;

    // Check it's there first, so we can list what is there if not
    if zip.index_for_name(&decoded).is_none() {
        return Err(FetchError::NotInArchive {
            name: decoded.into_owned(),
            archive: archive.to_string(),
            contents: zip.file_names().map(str::to_string).collect(),
        });
    }

    let extract_err = |source| FetchError::Extract {
        name: decoded.to_string(),
        archive: archive.to_string(),
        source,
    };

    let mut file = zip
        .by_name(&decoded)
        .map_err(|e| extract_err(io::Error::other(e)))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(extract_err)?;

    Ok(contents)
}
