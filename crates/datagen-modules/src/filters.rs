//! One-pole filter coefficient tables.
//!
//! Coefficients are computed in floating point, scaled to Q7 and re-typed
//! to `int8_t` records `{a1, b0, b1}`.

use std::f64::consts::PI;

use datagen_codegen::{convert, Header, Record, Value};

use crate::params::{ModuleConfig, ParamField, Params};
use crate::{check_min, Module, ModuleResult, ParamRegistry, Selector};

const Q7_SCALE: f64 = 128.0;
const COEFFICIENT_CTYPE: &str = "int8_t";

/// Filter tables module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filters;

#[derive(Debug)]
struct FiltersConfig {
    sample_rate: f64,
    data_attributes: Vec<String>,
    frequencies: usize,
    frequency_max: f64,
    frequency_min: f64,
    frequency_descriptions_string_width: Option<i32>,
}

impl ModuleConfig for FiltersConfig {
    const FIELDS: &'static [ParamField] = &[
        ParamField::required("sample_rate"),
        ParamField::optional("data_attributes"),
        ParamField::required("frequencies"),
        ParamField::required("frequency_max"),
        ParamField::required("frequency_min"),
        ParamField::optional("frequency_descriptions_string_width"),
    ];

    fn from_params(params: &Params) -> ModuleResult<Self> {
        Ok(Self {
            sample_rate: params.require("sample_rate")?,
            data_attributes: params.get("data_attributes")?.unwrap_or_default(),
            frequencies: params.require("frequencies")?,
            frequency_max: params.require("frequency_max")?,
            frequency_min: params.require("frequency_min")?,
            frequency_descriptions_string_width: params
                .get("frequency_descriptions_string_width")?,
        })
    }
}

/// Coefficients of a one-pole filter section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    pub a1: f64,
    pub b0: f64,
    pub b1: f64,
}

impl OnePole {
    /// Bilinear-transform lowpass for normalized cutoff `alpha = 2*pi*fc/fs`.
    pub fn lowpass(alpha: f64) -> Self {
        let b = alpha / (alpha + 2.0);
        Self {
            a1: -(alpha - 2.0) / (alpha + 2.0),
            b0: b,
            b1: b,
        }
    }

    /// Highpass counterpart of [`OnePole::lowpass`].
    pub fn highpass(alpha: f64) -> Self {
        let d = 1.0 + alpha / 2.0;
        Self {
            a1: (1.0 - alpha / 2.0) / d,
            b0: 1.0 / d,
            b1: -1.0 / d,
        }
    }

    fn to_q7_record(self) -> Value {
        Record::new()
            .with("a1", self.a1 * Q7_SCALE)
            .with("b0", self.b0 * Q7_SCALE)
            .with("b1", self.b1 * Q7_SCALE)
            .into()
    }
}

/// Exponentially spaced cutoff frequencies from `min` to `max`.
pub fn cutoff_frequencies(count: usize, min: f64, max: f64) -> Vec<f64> {
    let last = (count - 1) as f64;
    let raw: Vec<f64> = (0..count)
        .map(|i| -1.0 + (3.0 * i as f64 / last).exp())
        .collect();
    let end = raw[count - 1];
    raw.iter().map(|f| min + (max - min) * f / end).collect()
}

/// Human-readable frequency: `Hz` up to 1 kHz, `kHz` above.
pub fn describe_frequency(freq: f64) -> String {
    if freq > 1000.0 {
        format!("{:.2}kHz", freq / 1000.0)
    } else {
        format!("{}Hz", freq as i64)
    }
}

fn coefficient_table(alphas: &[f64], section: fn(f64) -> OnePole) -> ModuleResult<Value> {
    let records: Value = alphas
        .iter()
        .map(|alpha| section(*alpha).to_q7_record())
        .collect();
    Ok(convert::sequence_of_records(&records, COEFFICIENT_CTYPE)?)
}

impl Module for Filters {
    fn name(&self) -> &'static str {
        "filters"
    }

    fn allowed_selectors(&self) -> &'static [&'static str] {
        &["lowpass_1pole", "highpass_1pole", "descriptions"]
    }

    fn render(
        &self,
        header: &mut Header,
        identifier: &str,
        registry: &ParamRegistry,
        params: &Record,
        selector: &Selector,
    ) -> ModuleResult<()> {
        let config: FiltersConfig = registry.evaluate(self.name(), params, selector)?;
        check_min("frequencies", config.frequencies, 2)?;

        let freqs = cutoff_frequencies(
            config.frequencies,
            config.frequency_min,
            config.frequency_max,
        );
        let alphas: Vec<f64> = freqs
            .iter()
            .map(|f| 2.0 * PI * f / config.sample_rate)
            .collect();

        if selector.is_selected(&["lowpass_1pole"]) {
            header.add_data(
                format!("{}_lowpass_1pole_coefficients", identifier),
                coefficient_table(&alphas, OnePole::lowpass)?,
                config.data_attributes.clone(),
                None,
            );
        }

        if selector.is_selected(&["highpass_1pole"]) {
            header.add_data(
                format!("{}_highpass_1pole_coefficients", identifier),
                coefficient_table(&alphas, OnePole::highpass)?,
                config.data_attributes.clone(),
                None,
            );
        }

        if selector.is_selected(&["descriptions"]) {
            let descriptions: Value = freqs.iter().map(|f| describe_frequency(*f)).collect();
            header.add_data(
                format!("{}_frequency_descriptions", identifier),
                descriptions,
                config.data_attributes.clone(),
                config.frequency_descriptions_string_width,
            );
        }

        Ok(())
    }
}
