//! Oscillator wavetables: sine and band-limited square, triangle and
//! sawtooth.
//!
//! Band-limited tables are built per octave by integrating a band-limited
//! impulse train (BLIT) whose harmonic count stays below Nyquist for the
//! octave's center frequency.

use std::f64::consts::PI;

use datagen_codegen::{convert, Header, Record, Value};

use crate::error::ModuleError;
use crate::params::{selected, ModuleConfig, ParamField, Params};
use crate::{check_min, note_frequency, Module, ModuleResult, ParamRegistry, Selector, MIDI_NOTES};

const BANDLIMITED: &[&str] = &["blsquare", "bltriangle", "blsawtooth"];

/// Number of octaves covering the MIDI note range.
pub const OCTAVES: usize = ((MIDI_NOTES + 11) / 12) as usize;

/// Wavetables module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wavetables;

#[derive(Debug)]
struct WavetablesConfig {
    samples_per_cycle: usize,
    sample_amplitude: f64,
    sample_scalar_type: String,
    data_attributes: Vec<String>,
    sample_rate: Option<f64>,
    bandlimited_omit_high_octaves: Option<i64>,
}

impl ModuleConfig for WavetablesConfig {
    const FIELDS: &'static [ParamField] = &[
        ParamField::required("samples_per_cycle"),
        ParamField::required("sample_amplitude"),
        ParamField::required("sample_scalar_type"),
        ParamField::optional("data_attributes"),
        ParamField::selected_by("sample_rate", BANDLIMITED),
        ParamField::optional("bandlimited_omit_high_octaves"),
    ];

    fn from_params(params: &Params) -> ModuleResult<Self> {
        Ok(Self {
            samples_per_cycle: params.require("samples_per_cycle")?,
            sample_amplitude: params.require("sample_amplitude")?,
            sample_scalar_type: params.require("sample_scalar_type")?,
            data_attributes: params.get("data_attributes")?.unwrap_or_default(),
            sample_rate: params.get("sample_rate")?,
            bandlimited_omit_high_octaves: params.get("bandlimited_omit_high_octaves")?,
        })
    }
}

/// Geometric mean of the first and last note frequencies of an octave.
pub fn octave_frequency(octave: usize) -> f64 {
    let first = (octave as i32 * 12).min(MIDI_NOTES - 1);
    let last = ((octave as i32 + 1) * 12 - 1).min(MIDI_NOTES - 1);
    (note_frequency(first) * note_frequency(last)).sqrt()
}

/// One sine cycle of `samples` points scaled to `amplitude`.
pub fn sine(samples: usize, amplitude: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| amplitude * (2.0 * PI * i as f64 / samples as f64).sin())
        .collect()
}

/// Normalizes a cycle to `[-amplitude, amplitude]` and reverses it.
pub fn fix_wavetable(data: &[f64], amplitude: f64) -> Vec<f64> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = (2.0 * amplitude) / (max - min).abs();
    data.iter()
        .rev()
        .map(|v| (v - min) * scale - amplitude)
        .collect()
}

/// Band-limited tables of one octave.
#[derive(Debug, Default)]
pub struct OctaveTables {
    pub square: Option<Vec<f64>>,
    pub triangle: Option<Vec<f64>>,
    pub sawtooth: Option<Vec<f64>>,
}

/// Band-limited impulse train over one cycle with `harmonics` odd harmonics.
fn blit(samples: usize, harmonics: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| {
            let pos = (i as f64 - samples as f64 / 2.0) / samples as f64;
            if pos == 0.0 {
                1.0
            } else {
                (PI * pos * harmonics).sin() / (harmonics * (PI * pos).sin())
            }
        })
        .collect()
}

/// Computes the requested band-limited tables for one octave.
pub fn bandlimited_octave(
    octave: usize,
    samples: usize,
    amplitude: f64,
    sample_rate: f64,
    selector: &Selector,
) -> OctaveTables {
    let period = sample_rate / octave_frequency(octave);
    let mut harmonics = period.trunc();
    if harmonics % 2.0 == 0.0 {
        harmonics -= 1.0;
    }

    let impulses = blit(samples, harmonics);
    let mid = samples / 2;
    let shifted = |i: usize| if i < mid { impulses[i + mid] } else { impulses[i - mid] };

    let mut tables = OctaveTables::default();

    if selector.any_selected(&["blsquare", "bltriangle"]) {
        let mut square = Vec::with_capacity(samples);
        let mut v = 0.0;
        for (i, impulse) in impulses.iter().enumerate() {
            v += impulse - shifted(i);
            square.push(v);
        }

        if selector.is_selected(&["bltriangle"]) {
            let avg = square.iter().sum::<f64>() / samples as f64;
            let mut triangle = Vec::with_capacity(samples);
            let mut v = 0.0;
            for sq in &square {
                v += sq - avg;
                triangle.push(v);
            }
            triangle.rotate_left(samples / 4);
            tables.triangle = Some(fix_wavetable(&triangle, amplitude));
        }
        tables.square = Some(fix_wavetable(&square, amplitude));
    }

    if selector.is_selected(&["blsawtooth"]) {
        let mut sawtooth = Vec::with_capacity(samples);
        let mut v = 0.0;
        for i in 0..samples {
            v += shifted(i) - 1.0 / period;
            sawtooth.push(-v);
        }
        tables.sawtooth = Some(fix_wavetable(&sawtooth, amplitude));
    }

    tables
}

impl Module for Wavetables {
    fn name(&self) -> &'static str {
        "wavetables"
    }

    fn allowed_selectors(&self) -> &'static [&'static str] {
        &["sine", "blsquare", "bltriangle", "blsawtooth"]
    }

    fn render(
        &self,
        header: &mut Header,
        identifier: &str,
        registry: &ParamRegistry,
        params: &Record,
        selector: &Selector,
    ) -> ModuleResult<()> {
        let config: WavetablesConfig = registry.evaluate(self.name(), params, selector)?;
        check_min("samples_per_cycle", config.samples_per_cycle, 2)?;
        let ctype = config.sample_scalar_type.as_str();
        let amplitude = config.sample_amplitude;

        let amp = convert::scalar(&Value::Float64(amplitude), ctype)?;
        header.add_macro(format!("{}_sample_amplitude", identifier), amp, true, false);

        if selector.is_selected(&["sine"]) {
            header.add_data(
                format!("{}_sine", identifier),
                convert::sequence(&Value::from(sine(config.samples_per_cycle, amplitude)), ctype)?,
                config.data_attributes.clone(),
                None,
            );
        }

        if !selector.any_selected(BANDLIMITED) {
            return Ok(());
        }

        let mut octaves = OCTAVES;
        if let Some(omit) = config.bandlimited_omit_high_octaves {
            match usize::try_from(omit) {
                Ok(omit) if omit < OCTAVES => octaves -= omit,
                _ => {
                    return Err(ModuleError::invalid_param(
                        "bandlimited_omit_high_octaves",
                        format!("must be >= 0 and < {}", OCTAVES),
                    ))
                }
            }
        }

        let sample_rate = *selected(&config.sample_rate, "sample_rate")?;
        let tables: Vec<OctaveTables> = (0..octaves)
            .map(|octave| {
                bandlimited_octave(
                    octave,
                    config.samples_per_cycle,
                    amplitude,
                    sample_rate,
                    selector,
                )
            })
            .collect();

        let outputs: [(&str, fn(&OctaveTables) -> Option<&Vec<f64>>); 3] = [
            ("blsquare", |t| t.square.as_ref()),
            ("bltriangle", |t| t.triangle.as_ref()),
            ("blsawtooth", |t| t.sawtooth.as_ref()),
        ];
        for (tag, table) in outputs {
            if !selector.is_selected(&[tag]) {
                continue;
            }
            let rows: Value = tables
                .iter()
                .filter_map(table)
                .map(|row| Value::from(row.clone()))
                .collect();
            header.add_data(
                format!("{}_{}", identifier, tag),
                convert::sequence(&rows, ctype)?,
                config.data_attributes.clone(),
                None,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_selected() -> Selector {
        Selector::new(
            Wavetables.allowed_selectors(),
            &["sine", "blsquare", "bltriangle", "blsawtooth"],
        )
        .unwrap()
    }

    #[test]
    fn test_octave_count() {
        assert_eq!(OCTAVES, 11);
    }

    #[test]
    fn test_octave_frequency_clamps_to_midi_range() {
        // Octave 10 spans notes 120..=127 only.
        let expected = (note_frequency(120) * note_frequency(127)).sqrt();
        assert_eq!(octave_frequency(10), expected);
        assert!(octave_frequency(0) < octave_frequency(1));
    }

    #[test]
    fn test_sine() {
        let table = sine(4, 100.0);
        assert_eq!(table[0], 0.0);
        assert!((table[1] - 100.0).abs() < 1e-9);
        assert!((table[3] + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fix_wavetable_normalizes_and_reverses() {
        assert_eq!(fix_wavetable(&[0.0, 1.0, 2.0], 10.0), vec![10.0, 0.0, -10.0]);
    }

    #[test]
    fn test_bandlimited_octave_ranges() {
        let tables = bandlimited_octave(4, 256, 1000.0, 48000.0, &all_selected());
        for table in [&tables.square, &tables.triangle, &tables.sawtooth] {
            let table = table.as_ref().unwrap();
            assert_eq!(table.len(), 256);
            let max = table.iter().copied().fold(f64::MIN, f64::max);
            let min = table.iter().copied().fold(f64::MAX, f64::min);
            assert!((max - 1000.0).abs() < 1e-6);
            assert!((min + 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bandlimited_octave_only_selected() {
        let selector = Selector::new(Wavetables.allowed_selectors(), &["blsawtooth"]).unwrap();
        let tables = bandlimited_octave(0, 64, 1.0, 48000.0, &selector);
        assert!(tables.square.is_none());
        assert!(tables.triangle.is_none());
        assert!(tables.sawtooth.is_some());
    }
}
