//! Tests rendering every module into a header through `render_module`.

use datagen_codegen::{Header, Record};
use datagen_modules::{render_module, ModuleError, ParamRegistry};
use pretty_assertions::assert_eq;

// =============================================================================
// Helper Functions
// =============================================================================

fn global() -> ParamRegistry {
    ParamRegistry::new(
        Record::new()
            .with("sample_rate", 48000i32)
            .with("data_attributes", vec!["__attribute__((section(\".rodata\")))"]),
    )
}

fn render(name: &str, params: Record, selectors: &[&str]) -> Result<String, ModuleError> {
    let mut header = Header::new();
    render_module(&mut header, &global(), "tbl", name, &params, selectors)?;
    Ok(header.render()?)
}

// =============================================================================
// Notes
// =============================================================================

#[test]
fn test_notes_phase_steps_and_names() {
    let params = Record::new()
        .with("samples_per_cycle", 256i32)
        .with("phase_steps_type", "uint32_t")
        .with("phase_steps_fractional_bit_width", 8i32);
    let text = render("notes", params, &["phase_steps", "names"]).unwrap();

    assert!(text.contains(
        "static const uint32_t tbl_phase_steps[128] __attribute__((section(\".rodata\"))) = {"
    ));
    assert!(text.contains("#define tbl_phase_steps_len 128\n"));
    assert!(text.contains("static const char* const tbl_names[128]"));
    assert!(text.contains("\"C-1\", \"C#-1\", \"D-1\""));
    assert!(text.contains("\"G9\",\n};\n"));
}

#[test]
fn test_notes_missing_selected_parameter() {
    let err = render("notes", Record::new(), &["phase_steps"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "parameter not defined: samples_per_cycle (required by selector \"phase_steps\")"
    );
}

#[test]
fn test_notes_names_need_no_parameters() {
    let text = render("notes", Record::new(), &["names"]).unwrap();
    assert!(text.contains("tbl_names[128]"));
    assert!(!text.contains("phase_steps"));
}

// =============================================================================
// ADSR
// =============================================================================

#[test]
fn test_adsr_all_tables() {
    let params = Record::new()
        .with("samples", 64i32)
        .with("sample_amplitude", 255i32)
        .with("sample_scalar_type", "uint8_t")
        .with("time_steps", 16i32)
        .with("time_steps_min_ms", 2i32)
        .with("time_steps_max_ms", 20000i32)
        .with("time_steps_scalar_type", "uint32_t")
        .with("time_steps_fractional_bit_width", 16i32)
        .with("level_descriptions", 5i32)
        .with("level_descriptions_string_width", 6i32)
        .with("adsr_time_descriptions_string_width", -6i32);
    let text = render(
        "adsr",
        params,
        &["curves_as3310", "curves_linear", "time_steps", "descriptions"],
    )
    .unwrap();

    assert!(text.contains("static const uint8_t tbl_curve_as3310_attack[64]"));
    assert!(text.contains("static const uint8_t tbl_curve_as3310_decay_release[64]"));
    assert!(text.contains("static const uint8_t tbl_curve_linear[64]"));
    assert!(text.contains("static const uint32_t tbl_time_steps[16]"));
    assert!(text.contains("static const char tbl_level_descriptions[5][6]"));
    assert!(text.contains("\"  0.0%\", \" 25.0%\", \" 50.0%\", \" 75.0%\", \"100.0%\""));
    assert!(text.contains("static const char tbl_time_descriptions[16][6]"));
    assert!(text.contains("\"2ms   \""));
    assert!(text.contains("\"20.0s \""));
}

#[test]
fn test_adsr_requires_samples() {
    let err = render("adsr", Record::new(), &["curves_linear"]).unwrap_err();
    assert_eq!(err.to_string(), "parameter not defined: samples (required)");
}

#[test]
fn test_adsr_rejects_bad_scalar_type() {
    let params = Record::new()
        .with("samples", 8i32)
        .with("sample_amplitude", 1.0f64)
        .with("sample_scalar_type", "bool");
    let err = render("adsr", params, &["curves_linear"]).unwrap_err();
    assert!(matches!(err, ModuleError::Codegen(_)));
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_filters_coefficients_and_descriptions() {
    let params = Record::new()
        .with("frequencies", 32i32)
        .with("frequency_min", 20.0f64)
        .with("frequency_max", 16000.0f64)
        .with("frequency_descriptions_string_width", 9i32);
    let text = render(
        "filters",
        params,
        &["lowpass_1pole", "highpass_1pole", "descriptions"],
    )
    .unwrap();

    assert!(text.contains(
        "static const struct {\n    int8_t a1;\n    int8_t b0;\n    int8_t b1;\n} tbl_lowpass_1pole_coefficients[32]"
    ));
    assert!(text.contains("tbl_highpass_1pole_coefficients[32]"));
    assert!(text.contains("static const char tbl_frequency_descriptions[32][9]"));
    assert!(text.contains("\"     20Hz\""));
    assert!(text.contains("\" 16.00kHz\""));
}

// =============================================================================
// Wavetables
// =============================================================================

#[test]
fn test_wavetables_sine_and_bandlimited() {
    let params = Record::new()
        .with("samples_per_cycle", 64i32)
        .with("sample_amplitude", 0x7fffi32)
        .with("sample_scalar_type", "int16_t")
        .with("bandlimited_omit_high_octaves", 3i32);
    let text = render("wavetables", params, &["sine", "blsquare", "blsawtooth"]).unwrap();

    assert!(text.contains("\n#define tbl_sample_amplitude 0x7fff\n"));
    assert!(text.contains("static const int16_t tbl_sine[64]"));
    assert!(text.contains("static const int16_t tbl_blsquare[8][64]"));
    assert!(text.contains("#define tbl_blsquare_rows 8\n#define tbl_blsquare_cols 64\n"));
    assert!(text.contains("static const int16_t tbl_blsawtooth[8][64]"));
    assert!(!text.contains("tbl_bltriangle"));
}

#[test]
fn test_wavetables_omit_octaves_out_of_range() {
    let params = Record::new()
        .with("samples_per_cycle", 64i32)
        .with("sample_amplitude", 100i32)
        .with("sample_scalar_type", "int8_t")
        .with("bandlimited_omit_high_octaves", 11i32);
    let err = render("wavetables", params, &["bltriangle"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid parameter 'bandlimited_omit_high_octaves': must be >= 0 and < 11"
    );
}

#[test]
fn test_wavetables_sine_values() {
    let params = Record::new()
        .with("samples_per_cycle", 4i32)
        .with("sample_amplitude", 100i32)
        .with("sample_scalar_type", "int8");
    let mut header = Header::new();
    render_module(&mut header, &global(), "w", "wavetables", &params, &["sine"]).unwrap();
    assert_eq!(
        header.render().unwrap(),
        concat!(
            "// Code generated by \"synth-datagen\"; DO NOT EDIT.\n",
            "\n",
            "#pragma once\n",
            "\n",
            "#define w_sample_amplitude 0x64\n",
            "\n",
            "static const int8_t w_sine[4] __attribute__((section(\".rodata\"))) = {\n",
            "    0x00, 0x64, 0x00, 0x9c,\n",
            "};\n",
            "#define w_sine_len 4\n",
        )
    );
}
