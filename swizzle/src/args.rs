// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! swizzle - command line arguments.

use clap::Parser;
use std::path::PathBuf;

use swizzle_common::{ByteOrder, Profile, SwizzleConfig, WordGeometry};

const BITS_HELP: &str = "\
<BITS> is a comma-separated list of 0-based bit indexes, most significant
first.  The address list must name every address line of the (padded) image
and the data list every data line of a word (8 per byte).

Example: to reverse the order of bits in each byte:
  swizzle -d0,1,2,3,4,5,6,7 in.bin out.bin";

#[derive(Parser, Debug)]
#[command(
    name = "swizzle",
    about = "Reorder the address and data bits of a ROM image",
    version,
    after_help = BITS_HELP
)]
pub struct Args {
    /// Input ROM image (file, or http(s) URL)
    pub in_path: String,

    /// Output ROM image
    pub out_path: PathBuf,

    /// Address bit order
    #[arg(short, long, value_name = "BITS")]
    pub addr: Option<String>,

    /// Data bit order
    #[arg(short, long, value_name = "BITS")]
    pub data: Option<String>,

    /// Bytes per word, 1-4 (default 1)
    #[arg(short, long, value_name = "NUM", allow_negative_numbers = true)]
    pub word: Option<i64>,

    /// Use big-endian byte ordering within each word
    #[arg(short, long, conflicts_with = "little")]
    pub big: bool,

    /// Use little-endian byte ordering within each word (the default,
    /// overrides a profile)
    #[arg(short, long)]
    pub little: bool,

    /// Reject bit indexes that are specified more than once
    #[arg(short, long, conflicts_with = "no_strict")]
    pub strict: bool,

    /// Warn about repeated bit indexes rather than rejecting them (the
    /// default, overrides a profile)
    #[arg(long)]
    pub no_strict: bool,

    /// Apply the inverse of the bit orders, undoing a previous swizzle
    #[arg(short, long)]
    pub inverse: bool,

    /// Treat the input as a zip archive and swizzle this file from it
    #[arg(short = 'x', long, value_name = "FILE")]
    pub extract: Option<String>,

    /// Load default options from a JSON profile
    #[arg(short, long, value_name = "FILE")]
    pub profile: Option<PathBuf>,
}

impl Args {
    /// Builds the run configuration.  Options given on the command line
    /// override those from the profile.
    pub fn gen_config(&self) -> swizzle_common::Result<SwizzleConfig> {
        let profile = match &self.profile {
            Some(path) => Profile::load(path)?,
            None => Profile::default(),
        };

        let bytes_per_word = self.word.or(profile.word).unwrap_or(1);
        let big_endian = flag(self.big, self.little).or(profile.big_endian);
        let byte_order = if big_endian.unwrap_or(false) {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        let strict = flag(self.strict, self.no_strict).or(profile.strict);

        Ok(SwizzleConfig {
            addr_bits: self.addr.clone().or(profile.addr),
            data_bits: self.data.clone().or(profile.data),
            word: WordGeometry::new(bytes_per_word, byte_order)?,
            strict: strict.unwrap_or(false),
            inverse: self.inverse,
        })
    }
}

// A switch given on the command line, or `None` to fall back to the profile.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::io::Write;
    use swizzle_common::SwizzleError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("swizzle").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_short_options() {
        let args = parse(&["-d0,1,2,3,4,5,6,7", "-a", "1,0", "-w2", "-b", "in.bin", "out.bin"]);
        assert_eq!(args.in_path, "in.bin");
        assert_eq!(args.out_path, PathBuf::from("out.bin"));

        let config = args.gen_config().unwrap();
        assert_eq!(config.data_bits.as_deref(), Some("0,1,2,3,4,5,6,7"));
        assert_eq!(config.addr_bits.as_deref(), Some("1,0"));
        assert_eq!(config.word.bytes_per_word(), 2);
        assert_eq!(config.word.byte_order(), ByteOrder::Big);
        assert!(!config.strict);
        assert!(!config.inverse);
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["in.bin", "out.bin"]).gen_config().unwrap();
        assert_eq!(config, SwizzleConfig::default());
    }

    #[test]
    fn test_long_options() {
        let args = parse(&[
            "--addr=2,1,0",
            "--word",
            "4",
            "--strict",
            "--inverse",
            "in.bin",
            "out.bin",
        ]);
        let config = args.gen_config().unwrap();
        assert_eq!(config.addr_bits.as_deref(), Some("2,1,0"));
        assert_eq!(config.word.bytes_per_word(), 4);
        assert_eq!(config.word.byte_order(), ByteOrder::Little);
        assert!(config.strict);
        assert!(config.inverse);
    }

    #[test]
    fn test_word_out_of_range() {
        for word in ["0", "5", "-1"] {
            let err = parse(&["-w", word, "in.bin", "out.bin"]).gen_config().unwrap_err();
            assert!(matches!(err, SwizzleError::InvalidWordSize(_)));
        }
    }

    #[test]
    fn test_missing_positional() {
        let err = Args::try_parse_from(["swizzle", "in.bin"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_option() {
        let err = Args::try_parse_from(["swizzle", "--bogus", "in.bin", "out.bin"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help() {
        let err = Args::try_parse_from(["swizzle", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_profile_overridden_by_command_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "addr": "0,1", "data": "7,6,5,4,3,2,1,0", "word": 2, "big_endian": true, "strict": true }}"#
        )
        .unwrap();
        let profile = file.path().to_str().unwrap();

        let config = parse(&["-p", profile, "in.bin", "out.bin"]).gen_config().unwrap();
        assert_eq!(config.addr_bits.as_deref(), Some("0,1"));
        assert_eq!(config.word.bytes_per_word(), 2);
        assert_eq!(config.word.byte_order(), ByteOrder::Big);
        assert!(config.strict);

        let config = parse(&["-p", profile, "-w1", "-a", "1,0", "in.bin", "out.bin"])
            .gen_config()
            .unwrap();
        assert_eq!(config.addr_bits.as_deref(), Some("1,0"));
        assert_eq!(config.data_bits.as_deref(), Some("7,6,5,4,3,2,1,0"));
        assert_eq!(config.word.bytes_per_word(), 1);
    }

    #[test]
    fn test_profile_switches_turned_off() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "word": 2, "big_endian": true, "strict": true }}"#).unwrap();
        let profile = file.path().to_str().unwrap();

        let config = parse(&["-p", profile, "--little", "--no-strict", "in.bin", "out.bin"])
            .gen_config()
            .unwrap();
        assert_eq!(config.word.byte_order(), ByteOrder::Little);
        assert!(!config.strict);

        let config = parse(&["-p", profile, "-l", "in.bin", "out.bin"]).gen_config().unwrap();
        assert_eq!(config.word.byte_order(), ByteOrder::Little);
        assert!(config.strict);
    }

    #[test]
    fn test_conflicting_switches() {
        for conflict in [["-b", "-l"], ["--strict", "--no-strict"]] {
            let err = Args::try_parse_from(
                ["swizzle"].into_iter().chain(conflict).chain(["in.bin", "out.bin"]),
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        }
    }
}
