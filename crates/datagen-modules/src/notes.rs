//! Per-note tables: oscillator phase steps and note names.

use datagen_codegen::{convert, Header, Record, Value};

use crate::params::{selected, ModuleConfig, ParamField, Params};
use crate::{note_frequency, Module, ModuleResult, ParamRegistry, Selector, MIDI_NOTES};

const NOTE_PREFIXES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Note tables module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Notes;

#[derive(Debug)]
struct NotesConfig {
    sample_rate: Option<f64>,
    samples_per_cycle: Option<usize>,
    phase_steps_type: Option<String>,
    phase_steps_fractional_bit_width: Option<u8>,
    data_attributes: Vec<String>,
}

impl ModuleConfig for NotesConfig {
    const FIELDS: &'static [ParamField] = &[
        ParamField::selected_by("sample_rate", &["phase_steps"]),
        ParamField::selected_by("samples_per_cycle", &["phase_steps"]),
        ParamField::selected_by("phase_steps_type", &["phase_steps"]),
        ParamField::selected_by("phase_steps_fractional_bit_width", &["phase_steps"]),
        ParamField::optional("data_attributes"),
    ];

    fn from_params(params: &Params) -> ModuleResult<Self> {
        Ok(Self {
            sample_rate: params.get("sample_rate")?,
            samples_per_cycle: params.get("samples_per_cycle")?,
            phase_steps_type: params.get("phase_steps_type")?,
            phase_steps_fractional_bit_width: params.get("phase_steps_fractional_bit_width")?,
            data_attributes: params.get("data_attributes")?.unwrap_or_default(),
        })
    }
}

/// Returns the name of a MIDI note, `C-1` for note 0.
pub fn note_name(note: i32) -> String {
    format!("{}{}", NOTE_PREFIXES[note.rem_euclid(12) as usize], note.div_euclid(12) - 1)
}

/// Returns the fixed-point phase increment of every MIDI note for an
/// oscillator reading `samples_per_cycle` samples per period.
pub fn phase_steps(sample_rate: f64, samples_per_cycle: usize, fractional_bit_width: u8) -> Vec<u64> {
    let scale = 2f64.powi(i32::from(fractional_bit_width));
    (0..MIDI_NOTES)
        .map(|note| {
            let period = sample_rate / note_frequency(note);
            ((samples_per_cycle as f64 / period) * scale) as u64
        })
        .collect()
}

impl Module for Notes {
    fn name(&self) -> &'static str {
        "notes"
    }

    fn allowed_selectors(&self) -> &'static [&'static str] {
        &["phase_steps", "names"]
    }

    fn render(
        &self,
        header: &mut Header,
        identifier: &str,
        registry: &ParamRegistry,
        params: &Record,
        selector: &Selector,
    ) -> ModuleResult<()> {
        let config: NotesConfig = registry.evaluate(self.name(), params, selector)?;

        if selector.is_selected(&["phase_steps"]) {
            let steps = phase_steps(
                *selected(&config.sample_rate, "sample_rate")?,
                *selected(&config.samples_per_cycle, "samples_per_cycle")?,
                *selected(
                    &config.phase_steps_fractional_bit_width,
                    "phase_steps_fractional_bit_width",
                )?,
            );
            let steps = convert::sequence(
                &Value::from(steps),
                selected(&config.phase_steps_type, "phase_steps_type")?,
            )?;
            header.add_data(
                format!("{}_phase_steps", identifier),
                steps,
                config.data_attributes.clone(),
                None,
            );
        }

        if selector.is_selected(&["names"]) {
            let names: Value = (0..MIDI_NOTES).map(note_name).collect();
            header.add_data(
                format!("{}_names", identifier),
                names,
                config.data_attributes.clone(),
                None,
            );
        }

        Ok(())
    }
}
