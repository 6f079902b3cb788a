//! End-to-end tests for the generate command.
//!
//! Each test writes a configuration into a temporary directory, runs the
//! command and inspects the generated headers.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use datagen_cli::commands::generate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("synth-datagen.yml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn out_dir(dir: &TempDir) -> String {
    dir.path().join("out").to_string_lossy().into_owned()
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(Path::new(&out_dir(dir)).join(rel)).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_generates_every_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
output:
  include/first.h:
    includes:
      stdint.h: true
    macros:
      COUNT: {type: uint8, value: 3, hex: true}
    variables:
      table: {type: int8, value: [1, -1, 2]}
  second.h:
    variables:
      name: hello
"#,
    );

    let code = generate::run(&config, &out_dir(&dir)).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    assert_eq!(
        read(&dir, "include/first.h"),
        concat!(
            "// Code generated by \"synth-datagen\"; DO NOT EDIT.\n",
            "\n",
            "#pragma once\n",
            "\n",
            "#include <stdint.h>\n",
            "\n",
            "#define COUNT 0x03\n",
            "\n",
            "static const int8_t table[3] = {\n",
            "    0x01, 0xff, 0x02,\n",
            "};\n",
            "#define table_len 3\n",
        )
    );
    assert!(read(&dir, "second.h").contains("static const char* const name = \"hello\";"));
}

#[test]
fn test_generates_module_tables() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
global_parameters:
  sample_rate: 48000
  data_attributes: [PROGMEM]

output:
  notes.h:
    includes:
      avr/pgmspace.h: true
    modules:
      notes:
        name: notes
        parameters:
          samples_per_cycle: 256
          phase_steps_type: uint32
          phase_steps_fractional_bit_width: 8
        selectors: [phase_steps, names]
"#,
    );

    generate::run(&config, &out_dir(&dir)).unwrap();

    let header = read(&dir, "notes.h");
    assert!(header.contains("static const uint32_t notes_phase_steps[128] PROGMEM = {"));
    assert!(header.contains("#define notes_phase_steps_len 128"));
    assert!(header.contains("static const char* const notes_names[128] PROGMEM = {"));
    assert!(header.contains("\"A4\""));
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yml");
    let err = generate::run(&missing.to_string_lossy(), &out_dir(&dir)).unwrap_err();
    assert!(err.to_string().starts_with("Failed to load config"));
}

#[test]
fn test_module_error_aborts_before_write() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
output:
  ok.h:
    macros:
      A: 1
  bad.h:
    modules:
      x: {name: chorus, selectors: [a]}
  never.h:
    macros:
      B: 2
"#,
    );

    let err = generate::run(&config, &out_dir(&dir)).unwrap_err();
    assert_eq!(format!("{:#}", err), "Failed to generate: bad.h: module not found: chorus");

    assert!(Path::new(&out_dir(&dir)).join("ok.h").exists());
    assert!(!Path::new(&out_dir(&dir)).join("bad.h").exists());
    assert!(!Path::new(&out_dir(&dir)).join("never.h").exists());
}

#[test]
fn test_render_error_leaves_partial_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
output:
  partial.h:
    macros:
      GOOD: 1
      EMPTY: ~
"#,
    );

    assert!(generate::run(&config, &out_dir(&dir)).is_err());

    let text = read(&dir, "partial.h");
    assert!(text.contains("#define GOOD 1"));
    assert!(!text.contains("EMPTY"));
}
