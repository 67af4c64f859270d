//! croissant-tdml: convert GeoCroissant dataset metadata to a TDML document
//!
//! Usage:
//!   croissant-tdml dataset.geocroissant.json dataset.tdml.json
//!
//! Warnings about defaulted or skipped source fields go to stderr; a short
//! conversion summary goes to stdout. Exit is non-zero on any fatal error
//! (unreadable source, invalid JSON, no record set, unwritable output).

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use croissant_tdml::{convert, FileStore, RemapConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "croissant-tdml")]
#[command(about = "Convert GeoCroissant JSON metadata to a TDML document", long_about = None)]
struct Args {
    /// Path to the input GeoCroissant JSON
    #[arg(value_name = "GEOCROISSANT")]
    input: PathBuf,

    /// Path for the output TDML JSON
    #[arg(value_name = "TDML_OUT")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let outcome = convert(&FileStore, &args.input, &args.output, RemapConfig::default())?;

    for warning in &outcome.warnings {
        eprintln!("Warning: {}", warning);
    }

    let document = &outcome.document;
    let stats = &document["dataStatistics"];
    println!("TDML file written to {}", args.output.display());
    println!("Converted dataset: {}", document["name"].as_str().unwrap_or(""));
    println!("Total samples: {}", stats["totalSamples"]);
    println!("Training samples: {}", stats["trainingSamples"]);
    println!("Validation samples: {}", stats["validationSamples"]);
    println!("Classes: {}", document["numberOfClasses"]);
    println!("Bands: {}", document["bands"].as_array().map_or(0, Vec::len));
    println!("Data entries: {}", document["amountOfTrainingData"]);

    Ok(())
}
