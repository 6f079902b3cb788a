//! Generate command implementation
//!
//! Renders every header listed in the configuration file.

use anyhow::{Context, Result};
use colored::Colorize;
use datagen_codegen::Header;
use datagen_modules::{render_module, ModuleResult, ParamRegistry};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::config::{Config, OutputConfig};

/// Run the generate command
///
/// # Arguments
/// * `config_path` - Path to the YAML configuration file
/// * `out_dir` - Directory the header paths are relative to
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(config_path: &str, out_dir: &str) -> Result<ExitCode> {
    let Config {
        global_parameters,
        outputs,
    } = Config::load(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path))?;
    let registry = ParamRegistry::new(global_parameters);

    for output in &outputs {
        let path = Path::new(out_dir).join(&output.path);
        println!("{} {}", "Generating:".cyan().bold(), path.display());

        let header = build_header(output, &registry)
            .with_context(|| format!("Failed to generate: {}", output.path))?;
        write_header(&header, &path)?;
    }

    println!(
        "{} Generated {} header(s)",
        "SUCCESS".green().bold(),
        outputs.len()
    );

    Ok(ExitCode::SUCCESS)
}

/// Builds the header of one output: includes, then macros, then variables,
/// then module declarations, each in configuration order.
pub fn build_header(output: &OutputConfig, registry: &ParamRegistry) -> ModuleResult<Header> {
    let mut header = Header::new();

    for include in &output.includes {
        header.add_include(include.path.as_str(), include.system);
    }

    for m in &output.macros {
        header.add_macro(m.identifier.as_str(), m.value.clone(), m.hex, m.raw);
    }

    for v in &output.variables {
        header.add_data(
            v.identifier.as_str(),
            v.value.clone(),
            v.attributes.clone(),
            v.string_width,
        );
    }

    for module in &output.modules {
        render_module(
            &mut header,
            registry,
            &module.identifier,
            &module.name,
            &module.parameters,
            &module.selectors,
        )?;
    }

    Ok(header)
}

/// Writes a header, creating missing parent directories.
///
/// The file is streamed, so a declaration that fails to render leaves the
/// preceding text on disk.
fn write_header(header: &Header, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    header
        .write(&mut writer)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write: {}", path.display()))?;

    Ok(())
}
