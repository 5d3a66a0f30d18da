// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! swizzle - Main entry point.
//!
//! Reorders the address and/or data bits of a ROM image, to match a ROM
//! whose pins are wired differently to the way the image was dumped (or the
//! way it will be programmed).

mod args;
mod file;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

use swizzle_common::{SwizzleError, SwizzleReport, swizzle_file, swizzle_image, write_image};

use args::Args;
use file::{Input, load_input};

// Help, usage errors and all fatal errors
const EXIT_FAILURE: u8 = 1;

// Out of range --word
const EXIT_BAD_WORD_SIZE: u8 = 255;

fn main() -> ExitCode {
    println!("swizzle v{}", env!("CARGO_PKG_VERSION"));

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args
        .gen_config()
        .map_err(|e| anyhow::Error::new(e).context("Configuration error"))?;

    let input = load_input(&args.in_path, args.extract.as_deref())?;

    let report = match input {
        Input::File(path) => swizzle_file(&path, &args.out_path, &config)?,
        Input::Memory(image) => {
            let (output, report) = swizzle_image(&image, &config)?;
            write_image(&args.out_path, &output)?;
            report
        }
    };

    print_report(args, &report);

    Ok(())
}

fn print_report(args: &Args, report: &SwizzleReport) {
    for advisory in &report.advisories {
        eprintln!("warning: {}", advisory);
    }

    let geometry = &report.geometry;
    println!(
        "- {} byte {} words, {} address bits, {} data bits",
        geometry.word.bytes_per_word(),
        geometry.word.byte_order(),
        geometry.addr_bits,
        geometry.data_bits
    );
    println!(
        "- Wrote {} bytes to `{}`",
        geometry.working_size,
        args.out_path.display()
    );
}

fn exit_code(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<SwizzleError>() {
        Some(SwizzleError::InvalidWordSize(_)) => EXIT_BAD_WORD_SIZE,
        _ => EXIT_FAILURE,
    }
}
