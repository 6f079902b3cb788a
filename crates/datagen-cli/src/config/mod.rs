//! `synth-datagen.yml` configuration.
//!
//! The document lists global module parameters and one entry per generated
//! header. Every section keeps the order of the document, which is also the
//! order of the generated declarations.
//!
//! ```yaml
//! global_parameters:
//!   sample_rate: 48000
//! output:
//!   foo.h:
//!     includes: {stdint.h: true}
//!     macros: {FOO: 1, BAR: {type: uint8, value: 3, hex: true}}
//!     variables:
//!       tbl: {type: int16, value: [1, 2, 3]}
//!       # Starlark expression over `eval_env`.
//!       steps: {type: uint8, value: "[i * n for i in range(4)]", eval_env: {n: 3}}
//!     modules: {osc: {name: wavetables, selectors: [sine]}}
//! ```

mod error;
mod eval;
mod yaml;


use std::fs;
use std::path::Path;

use datagen_codegen::{convert, Record, Value};
use serde::Deserialize;
use serde_yaml::Value as Yaml;

pub use error::{ConfigError, ConfigResult};

/// A parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Fallback parameters shared by every module.
    pub global_parameters: Record,
    /// Headers to generate, in document order.
    pub outputs: Vec<OutputConfig>,
}

/// One generated header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputConfig {
    /// Header path, relative to the output directory.
    pub path: String,
    pub includes: Vec<IncludeConfig>,
    pub macros: Vec<MacroConfig>,
    pub variables: Vec<VariableConfig>,
    pub modules: Vec<ModuleConfig>,
}

/// An `#include` line.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeConfig {
    pub path: String,
    /// Whether the include uses angle brackets.
    pub system: bool,
}

/// A `#define` line.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroConfig {
    pub identifier: String,
    pub value: Option<Value>,
    pub hex: bool,
    pub raw: bool,
}

/// A static data declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableConfig {
    pub identifier: String,
    pub value: Option<Value>,
    pub attributes: Vec<String>,
    pub string_width: Option<i32>,
}

/// A DSP module rendered into the header.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    /// Prefix of every declaration the module adds.
    pub identifier: String,
    /// Module name, e.g. `wavetables`.
    pub name: String,
    pub parameters: Record,
    pub selectors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    global_parameters: Yaml,
    #[serde(default)]
    output: Yaml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOutput {
    includes: Yaml,
    macros: Yaml,
    variables: Yaml,
    modules: Yaml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMacro {
    #[serde(default, rename = "type")]
    ctype: String,
    #[serde(default)]
    value: Yaml,
    #[serde(default)]
    hex: bool,
    #[serde(default)]
    raw: bool,
    #[serde(default)]
    eval: bool,
    #[serde(default)]
    eval_env: Yaml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVariable {
    #[serde(default, rename = "type")]
    ctype: String,
    #[serde(default)]
    value: Yaml,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    string_width: Option<i32>,
    #[serde(default)]
    eval: bool,
    #[serde(default)]
    eval_env: Yaml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModule {
    name: String,
    #[serde(default)]
    parameters: Yaml,
    #[serde(default)]
    selectors: Vec<String>,
}

fn decode<T: serde::de::DeserializeOwned>(node: &Yaml, context: &str) -> ConfigResult<T> {
    serde_yaml::from_value(node.clone()).map_err(|source| ConfigError::InvalidEntry {
        context: context.to_string(),
        source,
    })
}

/// Resolves an entry value. A string is evaluated as an expression when
/// `eval` is set or `eval_env` binds any variable.
fn entry_value(
    value: &Yaml,
    eval: bool,
    eval_env: &Yaml,
    context: &str,
) -> ConfigResult<Option<Value>> {
    let env = yaml::to_record(eval_env, context)?;
    match value {
        Yaml::String(source) if eval || !env.is_empty() => eval::evaluate(source, &env, context),
        value => yaml::to_value(value, context),
    }
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parses a configuration document.
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let raw: RawConfig = serde_yaml::from_str(content)?;

        let outputs = yaml::entries(&raw.output, "output")?
            .into_iter()
            .map(|(path, node)| OutputConfig::parse(path, node))
            .collect::<ConfigResult<_>>()?;

        Ok(Self {
            global_parameters: yaml::to_record(&raw.global_parameters, "global_parameters")?,
            outputs,
        })
    }
}

impl OutputConfig {
    fn parse(path: &str, node: &Yaml) -> ConfigResult<Self> {
        let context = format!("output: {}", path);
        let raw: RawOutput = match node {
            Yaml::Null => RawOutput::default(),
            node => decode(node, &context)?,
        };

        let includes = yaml::entries(&raw.includes, "includes")?
            .into_iter()
            .map(|(path, node)| IncludeConfig::parse(path, node))
            .collect::<ConfigResult<_>>()?;
        let macros = yaml::entries(&raw.macros, "macros")?
            .into_iter()
            .map(|(identifier, node)| MacroConfig::parse(identifier, node))
            .collect::<ConfigResult<_>>()?;
        let variables = yaml::entries(&raw.variables, "variables")?
            .into_iter()
            .map(|(identifier, node)| VariableConfig::parse(identifier, node))
            .collect::<ConfigResult<_>>()?;
        let modules = yaml::entries(&raw.modules, "modules")?
            .into_iter()
            .map(|(identifier, node)| ModuleConfig::parse(identifier, node))
            .collect::<ConfigResult<_>>()?;

        Ok(Self {
            path: path.to_string(),
            includes,
            macros,
            variables,
            modules,
        })
    }
}

impl IncludeConfig {
    fn parse(path: &str, node: &Yaml) -> ConfigResult<Self> {
        let system = match node {
            Yaml::Null => false,
            node => decode(node, &format!("includes: {}", path))?,
        };
        Ok(Self {
            path: path.to_string(),
            system,
        })
    }
}

impl MacroConfig {
    /// A scalar node is the value itself; anything else is a
    /// `{type, value, hex, raw, eval, eval_env}` mapping.
    fn parse(identifier: &str, node: &Yaml) -> ConfigResult<Self> {
        let context = format!("macros: {}", identifier);

        if is_scalar_node(node) {
            return Ok(Self {
                identifier: identifier.to_string(),
                value: yaml::to_value(node, &context)?,
                hex: false,
                raw: false,
            });
        }

        let raw: RawMacro = decode(node, &context)?;
        let value = match entry_value(&raw.value, raw.eval, &raw.eval_env, &context)? {
            Some(value) if value.is_scalar() => value,
            _ => return Err(ConfigError::MacroNotScalar { context }),
        };
        let value = if raw.ctype.is_empty() {
            value
        } else {
            convert::scalar(&value, &raw.ctype)
                .map_err(|err| ConfigError::conversion(&context, err))?
        };

        Ok(Self {
            identifier: identifier.to_string(),
            value: Some(value),
            hex: raw.hex,
            raw: raw.raw,
        })
    }
}

impl VariableConfig {
    /// A mapping node is a `{type, value, attributes, string_width, eval,
    /// eval_env}` entry; anything else is the value itself.
    fn parse(identifier: &str, node: &Yaml) -> ConfigResult<Self> {
        let context = format!("variables: {}", identifier);

        if !node.is_mapping() {
            return Ok(Self {
                identifier: identifier.to_string(),
                value: yaml::to_value(node, &context)?,
                attributes: Vec::new(),
                string_width: None,
            });
        }

        let raw: RawVariable = decode(node, &context)?;
        let mut value = entry_value(&raw.value, raw.eval, &raw.eval_env, &context)?;
        if !raw.ctype.is_empty() {
            let converted = match &value {
                Some(v @ Value::Sequence(_)) => convert::sequence(v, &raw.ctype),
                Some(v) if v.is_scalar() => convert::scalar(v, &raw.ctype),
                _ => return Err(ConfigError::UnsupportedVariable { context }),
            };
            value = Some(converted.map_err(|err| ConfigError::conversion(&context, err))?);
        }

        Ok(Self {
            identifier: identifier.to_string(),
            value,
            attributes: raw.attributes,
            string_width: raw.string_width,
        })
    }
}

impl ModuleConfig {
    fn parse(identifier: &str, node: &Yaml) -> ConfigResult<Self> {
        let context = format!("modules: {}", identifier);
        let raw: RawModule = decode(node, &context)?;
        Ok(Self {
            identifier: identifier.to_string(),
            name: raw.name,
            parameters: yaml::to_record(&raw.parameters, &context)?,
            selectors: raw.selectors,
        })
    }
}

fn is_scalar_node(node: &Yaml) -> bool {
    matches!(
        node,
        Yaml::Null | Yaml::Bool(_) | Yaml::Number(_) | Yaml::String(_)
    )
}
