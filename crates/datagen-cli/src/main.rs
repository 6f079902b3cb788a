//! synth-datagen - C header generator for synthesizer lookup tables
//!
//! Reads a YAML configuration and writes one C header per configured output.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use datagen_cli::commands;

/// synth-datagen - Lookup-table header generator for synthesizer firmware
#[derive(Parser)]
#[command(name = "synth-datagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'f', long = "file", default_value = "synth-datagen.yml")]
    file: String,

    /// Path to output directory
    #[arg(short, long, default_value = ".")]
    output: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match commands::generate::run(&cli.file, &cli.output) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
