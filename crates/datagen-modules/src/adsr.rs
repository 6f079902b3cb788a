//! ADSR envelope tables.
//!
//! The AS3310 envelope chip charges its capacitor towards a 7 V asymptote and
//! ends the attack phase when the output reaches 5 V. The attack curve is
//! the exponential segment up to that point, rescaled to full amplitude; the
//! decay/release curve is the full exponential discharge.

use datagen_codegen::{convert, Header, Record, Value};

use crate::params::{selected, ModuleConfig, ParamField, Params};
use crate::{check_min, Module, ModuleResult, ParamRegistry, Selector};

const AS3310_ATTACK_ASYMPTOTE_VOLTAGE: f64 = 7.0;
const AS3310_ATTACK_PEAK_VOLTAGE: f64 = 5.0;

const CURVES: &[&str] = &["curves_as3310", "curves_linear"];
const TIMES: &[&str] = &["time_steps", "descriptions"];

/// Envelope tables module.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adsr;

#[derive(Debug)]
struct AdsrConfig {
    samples: usize,
    data_attributes: Vec<String>,
    sample_amplitude: Option<f64>,
    sample_scalar_type: Option<String>,
    sample_rate: Option<f64>,
    time_steps: Option<usize>,
    time_steps_min_ms: Option<i64>,
    time_steps_max_ms: Option<i64>,
    time_steps_scalar_type: Option<String>,
    time_steps_fractional_bit_width: Option<u8>,
    level_descriptions: Option<usize>,
    level_descriptions_string_width: Option<i32>,
    time_descriptions_string_width: Option<i32>,
}

impl ModuleConfig for AdsrConfig {
    const FIELDS: &'static [ParamField] = &[
        ParamField::required("samples"),
        ParamField::optional("data_attributes"),
        ParamField::selected_by("sample_amplitude", CURVES),
        ParamField::selected_by("sample_scalar_type", CURVES),
        ParamField::selected_by("sample_rate", &["time_steps"]),
        ParamField::selected_by("time_steps", TIMES),
        ParamField::selected_by("time_steps_min_ms", TIMES),
        ParamField::selected_by("time_steps_max_ms", TIMES),
        ParamField::selected_by("time_steps_scalar_type", &["time_steps"]),
        ParamField::optional("time_steps_fractional_bit_width"),
        ParamField::selected_by("level_descriptions", &["descriptions"]),
        ParamField::optional("level_descriptions_string_width"),
        ParamField::optional("time_descriptions_string_width"),
    ];

    fn from_params(params: &Params) -> ModuleResult<Self> {
        Ok(Self {
            samples: params.require("samples")?,
            data_attributes: params.get("data_attributes")?.unwrap_or_default(),
            sample_amplitude: params.get("sample_amplitude")?,
            sample_scalar_type: params.get("sample_scalar_type")?,
            sample_rate: params.get("sample_rate")?,
            time_steps: params.get("time_steps")?,
            time_steps_min_ms: params.get("time_steps_min_ms")?,
            time_steps_max_ms: params.get("time_steps_max_ms")?,
            time_steps_scalar_type: params.get("time_steps_scalar_type")?,
            time_steps_fractional_bit_width: params.get("time_steps_fractional_bit_width")?,
            level_descriptions: params.get("level_descriptions")?,
            level_descriptions_string_width: params.get("level_descriptions_string_width")?,
            time_descriptions_string_width: params.get("time_descriptions_string_width")?,
        })
    }
}

/// Evenly spaced positions in `[0, 1]`.
fn unit_ramp(samples: usize) -> Vec<f64> {
    let last = (samples - 1) as f64;
    (0..samples).map(|i| i as f64 / last).collect()
}

/// AS3310 attack and decay/release curves scaled to `amplitude`.
pub fn as3310_curves(samples: usize, amplitude: f64) -> (Vec<f64>, Vec<f64>) {
    let ramp = unit_ramp(samples);
    let base: Vec<f64> = ramp.iter().map(|t| 1.0 - (-3.0 * t).exp()).collect();
    let target = base[samples - 1];

    let peak_ratio = AS3310_ATTACK_PEAK_VOLTAGE / AS3310_ATTACK_ASYMPTOTE_VOLTAGE;
    let attack_peak = base
        .iter()
        .zip(&ramp)
        .find(|(v, _)| *v / target >= peak_ratio)
        .map(|(_, t)| *t)
        .unwrap_or(0.0);

    let base_attack: Vec<f64> = ramp
        .iter()
        .map(|t| 1.0 - (-3.0 * t * attack_peak).exp())
        .collect();
    let attack_end = base_attack[samples - 1];

    let attack = base_attack.iter().map(|v| amplitude * v / attack_end).collect();
    let release = base.iter().map(|v| amplitude * v / target).collect();
    (attack, release)
}

/// Linear curve from 0 to `amplitude`.
pub fn linear_curve(samples: usize, amplitude: f64) -> Vec<f64> {
    unit_ramp(samples).into_iter().map(|t| amplitude * t).collect()
}

/// Exponentially spaced phase durations in milliseconds, from `min_ms` to
/// `max_ms`.
pub fn phase_times(steps: usize, min_ms: i64, max_ms: i64) -> Vec<f64> {
    let last = (steps - 1) as f64;
    let raw: Vec<f64> = (0..steps)
        .map(|i| -1.0 + (6.0 * i as f64 / last).exp())
        .collect();
    let range = (max_ms - min_ms) as f64;
    let end = raw[steps - 1];
    raw.iter().map(|t| min_ms as f64 + range * t / end).collect()
}

/// Human-readable duration: milliseconds below one second.
pub fn describe_time(ms: f64) -> String {
    if ms > 10000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else if ms > 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{}ms", ms as i64)
    }
}

/// Human-readable level percentages, from 0% to 100%.
pub fn describe_levels(levels: usize) -> Vec<String> {
    let last = (levels - 1) as f64;
    (0..levels)
        .map(|i| format!("{:.1}%", 100.0 * i as f64 / last))
        .collect()
}

impl Module for Adsr {
    fn name(&self) -> &'static str {
        "adsr"
    }

    fn allowed_selectors(&self) -> &'static [&'static str] {
        &["curves_as3310", "curves_linear", "time_steps", "descriptions"]
    }

    fn render(
        &self,
        header: &mut Header,
        identifier: &str,
        registry: &ParamRegistry,
        params: &Record,
        selector: &Selector,
    ) -> ModuleResult<()> {
        let config: AdsrConfig = registry.evaluate(self.name(), params, selector)?;
        check_min("samples", config.samples, 2)?;
        let attributes = &config.data_attributes;

        if selector.is_selected(&["curves_as3310"]) {
            let amplitude = *selected(&config.sample_amplitude, "sample_amplitude")?;
            let ctype = selected(&config.sample_scalar_type, "sample_scalar_type")?;
            let (attack, release) = as3310_curves(config.samples, amplitude);
            header.add_data(
                format!("{}_curve_as3310_attack", identifier),
                convert::sequence(&Value::from(attack), ctype)?,
                attributes.clone(),
                None,
            );
            header.add_data(
                format!("{}_curve_as3310_decay_release", identifier),
                convert::sequence(&Value::from(release), ctype)?,
                attributes.clone(),
                None,
            );
        }

        if selector.is_selected(&["curves_linear"]) {
            let amplitude = *selected(&config.sample_amplitude, "sample_amplitude")?;
            let ctype = selected(&config.sample_scalar_type, "sample_scalar_type")?;
            header.add_data(
                format!("{}_curve_linear", identifier),
                convert::sequence(&Value::from(linear_curve(config.samples, amplitude)), ctype)?,
                attributes.clone(),
                None,
            );
        }

        let mut times = Vec::new();
        if selector.any_selected(TIMES) {
            let steps = *selected(&config.time_steps, "time_steps")?;
            check_min("time_steps", steps, 2)?;
            times = phase_times(
                steps,
                *selected(&config.time_steps_min_ms, "time_steps_min_ms")?,
                *selected(&config.time_steps_max_ms, "time_steps_max_ms")?,
            );
        }

        if selector.is_selected(&["time_steps"]) {
            let sample_rate = *selected(&config.sample_rate, "sample_rate")?;
            let scale = config
                .time_steps_fractional_bit_width
                .map_or(1.0, |bits| 2f64.powi(i32::from(bits)));
            let steps: Vec<f64> = times
                .iter()
                .map(|t| (config.samples as f64 * 1000.0) / (t * sample_rate) * scale)
                .collect();
            header.add_data(
                format!("{}_time_steps", identifier),
                convert::sequence(
                    &Value::from(steps),
                    selected(&config.time_steps_scalar_type, "time_steps_scalar_type")?,
                )?,
                attributes.clone(),
                None,
            );
        }

        if selector.is_selected(&["descriptions"]) {
            let levels = *selected(&config.level_descriptions, "level_descriptions")?;
            check_min("level_descriptions", levels, 2)?;
            header.add_data(
                format!("{}_level_descriptions", identifier),
                Value::from(describe_levels(levels)),
                attributes.clone(),
                config.level_descriptions_string_width,
            );

            let descriptions: Value = times.iter().map(|t| describe_time(*t)).collect();
            header.add_data(
                format!("{}_time_descriptions", identifier),
                descriptions,
                attributes.clone(),
                config.time_descriptions_string_width,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as3310_curves_span_amplitude() {
        let (attack, release) = as3310_curves(64, 255.0);
        assert_eq!(attack.len(), 64);
        assert_eq!(attack[0], 0.0);
        assert!((attack[63] - 255.0).abs() < 1e-9);
        assert!((release[63] - 255.0).abs() < 1e-9);
        assert!(attack.windows(2).all(|w| w[0] < w[1]));
        // The attack is the flatter part of the charge curve.
        assert!(attack[32] < release[32]);
    }

    #[test]
    fn test_linear_curve() {
        assert_eq!(linear_curve(5, 100.0), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_phase_times_endpoints() {
        let times = phase_times(16, 2, 10000);
        assert_eq!(times[0], 2.0);
        assert!((times[15] - 10000.0).abs() < 1e-9);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_describe_time() {
        assert_eq!(describe_time(2.7), "2ms");
        assert_eq!(describe_time(999.9), "999ms");
        assert_eq!(describe_time(1500.0), "1.50s");
        assert_eq!(describe_time(10000.0), "10.00s");
        assert_eq!(describe_time(12345.0), "12.3s");
    }

    #[test]
    fn test_describe_levels() {
        assert_eq!(describe_levels(3), vec!["0.0%", "50.0%", "100.0%"]);
    }
}
