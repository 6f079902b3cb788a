//! DSP lookup-table modules for synth-datagen.
//!
//! Each module computes one family of tables used by synthesizer firmware
//! and adds them to a [`Header`] as C data declarations:
//!
//! - [`adsr`]: envelope curves, time steps and descriptions
//! - [`filters`]: one-pole filter coefficients and cutoff descriptions
//! - [`notes`]: per-note phase steps and note names
//! - [`wavetables`]: sine and band-limited oscillator tables
//!
//! Modules are parametrized through a [`ParamRegistry`] and restricted to a
//! subset of their tables through a [`Selector`].

pub mod adsr;
pub mod error;
pub mod filters;
pub mod notes;
pub mod params;
pub mod selector;
pub mod wavetables;

pub use error::{ModuleError, ModuleResult};
pub use params::{ModuleConfig, ParamField, ParamRegistry, Params};
pub use selector::Selector;

use datagen_codegen::{Header, Record};

/// Frequency of A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI_NUMBER: i32 = 69;

/// Number of MIDI notes.
pub const MIDI_NOTES: i32 = 128;

/// Equal-temperament frequency of a MIDI note.
pub fn note_frequency(note: i32) -> f64 {
    A4_FREQUENCY * 2f64.powf(f64::from(note - A4_MIDI_NUMBER) / 12.0)
}

/// A DSP module rendering lookup tables into a header.
pub trait Module: Sync {
    /// Name used to reference the module from configuration.
    fn name(&self) -> &'static str;

    /// Selector tags the module accepts.
    fn allowed_selectors(&self) -> &'static [&'static str];

    /// Renders the selected tables under `<identifier>_<suffix>` names.
    fn render(
        &self,
        header: &mut Header,
        identifier: &str,
        registry: &ParamRegistry,
        params: &Record,
        selector: &Selector,
    ) -> ModuleResult<()>;
}

static MODULES: [&dyn Module; 4] = [
    &adsr::Adsr,
    &filters::Filters,
    &notes::Notes,
    &wavetables::Wavetables,
];

/// Returns every available module.
pub fn modules() -> &'static [&'static dyn Module] {
    &MODULES
}

/// Finds a module by name.
pub fn find_module(name: &str) -> Option<&'static dyn Module> {
    MODULES.iter().copied().find(|module| module.name() == name)
}

/// Renders module `name` into `header`.
///
/// The requested selectors are validated against the module's allowed list
/// before any parameter is resolved.
pub fn render_module<S: AsRef<str>>(
    header: &mut Header,
    registry: &ParamRegistry,
    identifier: &str,
    name: &str,
    params: &Record,
    selectors: &[S],
) -> ModuleResult<()> {
    let module = find_module(name).ok_or_else(|| ModuleError::UnknownModule(name.to_string()))?;
    let selector = Selector::new(module.allowed_selectors(), selectors)?;
    module.render(header, identifier, registry, params, &selector)
}

/// Fails unless a count parameter is at least `min`.
pub(crate) fn check_min(name: &str, value: usize, min: usize) -> ModuleResult<()> {
    if value < min {
        return Err(ModuleError::invalid_param(
            name,
            format!("must be at least {}, got {}", min, value),
        ));
    }
    Ok(())
}
