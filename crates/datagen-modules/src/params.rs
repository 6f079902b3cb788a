//! Parameter-resolution registry.
//!
//! Modules declare their parameters as a static table of [`ParamField`]s.
//! For each field `f` of module `m`, the registry searches the module's local
//! parameters for `m_f`, then `f`, and falls back to the global parameters in
//! the same order. Keys are compared after snake-case normalisation, so
//! `sampleRate` and `sample_rate` name the same parameter.

use datagen_codegen::convert;
use datagen_codegen::naming::field_name_to_snake;
use datagen_codegen::{Record, Value};

use crate::error::{ModuleError, ModuleResult};
use crate::selector::Selector;

/// Declaration of one module parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamField {
    /// Snake-case parameter name.
    pub name: &'static str,
    /// Whether the parameter may stay unresolved.
    pub optional: bool,
    /// Selector tags that make the parameter mandatory.
    pub selectors: &'static [&'static str],
}

impl ParamField {
    /// A parameter that must always resolve.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
            selectors: &[],
        }
    }

    /// A parameter that may stay unresolved.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optional: true,
            selectors: &[],
        }
    }

    /// An optional parameter that becomes mandatory when any of `selectors`
    /// is selected.
    pub const fn selected_by(name: &'static str, selectors: &'static [&'static str]) -> Self {
        Self {
            name,
            optional: true,
            selectors,
        }
    }
}

/// A typed module configuration built from resolved parameters.
pub trait ModuleConfig: Sized {
    /// Parameters of the module, in declaration order.
    const FIELDS: &'static [ParamField];

    /// Builds the configuration from resolved parameters.
    fn from_params(params: &Params) -> ModuleResult<Self>;
}

/// Conversion from a parameter value to a Rust type.
pub trait FromParam: Sized {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    fn from_param(value: &Value) -> Option<Self>;
}

impl FromParam for f64 {
    const TYPE_NAME: &'static str = "float64";

    fn from_param(value: &Value) -> Option<Self> {
        match convert::scalar(value, "float64").ok()? {
            Value::Float64(v) => Some(v),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const TYPE_NAME: &'static str = "int64";

    fn from_param(value: &Value) -> Option<Self> {
        match convert::scalar(value, "int64").ok()? {
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_param_int {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromParam for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_param(value: &Value) -> Option<Self> {
                    <$ty>::try_from(i64::from_param(value)?).ok()
                }
            }
        )*
    };
}

impl_from_param_int! {
    i32 => "int32",
    u8 => "uint8",
    usize => "non-negative integer",
}

impl FromParam for String {
    const TYPE_NAME: &'static str = "string";

    fn from_param(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromParam for Vec<String> {
    const TYPE_NAME: &'static str = "sequence of strings";

    fn from_param(value: &Value) -> Option<Self> {
        value
            .as_sequence()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }
}

/// Parameters resolved for one module invocation.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: Vec<(&'static str, Value)>,
}

impl Params {
    pub fn insert(&mut self, name: &'static str, value: Value) {
        self.values.push((name, value));
    }

    /// Returns the raw resolved value of a parameter.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Returns a parameter converted to `T`, `None` when unresolved.
    pub fn get<T: FromParam>(&self, name: &str) -> ModuleResult<Option<T>> {
        let Some(value) = self.raw(name) else {
            return Ok(None);
        };
        T::from_param(value)
            .map(Some)
            .ok_or_else(|| ModuleError::InvalidParameterType {
                name: name.to_string(),
                expected: T::TYPE_NAME,
                found: value.shape_name(),
            })
    }

    /// Returns a parameter converted to `T`, failing when unresolved.
    pub fn require<T: FromParam>(&self, name: &str) -> ModuleResult<T> {
        self.get(name)?.ok_or_else(|| ModuleError::ParameterNotDefined {
            name: name.to_string(),
            reason: "required".to_string(),
        })
    }
}

/// Returns a selector-gated parameter, failing when it was not resolved.
pub fn selected<'a, T>(value: &'a Option<T>, name: &str) -> ModuleResult<&'a T> {
    value.as_ref().ok_or_else(|| ModuleError::ParameterNotDefined {
        name: name.to_string(),
        reason: "required by selection".to_string(),
    })
}

/// Registry of global parameters shared by every module invocation.
#[derive(Debug, Clone, Default)]
pub struct ParamRegistry {
    global: Record,
}

impl ParamRegistry {
    pub fn new(global: Record) -> Self {
        Self { global }
    }

    pub fn global(&self) -> &Record {
        &self.global
    }

    /// Looks up a module parameter in local, then global parameters.
    pub fn lookup<'a>(&'a self, module: &str, field: &str, local: &'a Record) -> Option<&'a Value> {
        let prefixed = format!("{}_{}", module, field);
        lookup_key(local, &prefixed)
            .or_else(|| lookup_key(local, field))
            .or_else(|| lookup_key(&self.global, &prefixed))
            .or_else(|| lookup_key(&self.global, field))
    }

    /// Resolves every declared field of a module.
    pub fn resolve(
        &self,
        module: &str,
        fields: &[ParamField],
        local: &Record,
        selector: &Selector,
    ) -> ModuleResult<Params> {
        let mut params = Params::default();
        for field in fields {
            if let Some(value) = self.lookup(module, field.name, local) {
                params.insert(field.name, value.clone());
                continue;
            }

            let name = field_name_to_snake(field.name);
            if let Some(tag) = field.selectors.iter().find(|tag| selector.is_selected(&[**tag])) {
                return Err(ModuleError::ParameterNotDefined {
                    name,
                    reason: format!("required by selector {:?}", tag),
                });
            }
            if !field.optional {
                return Err(ModuleError::ParameterNotDefined {
                    name,
                    reason: "required".to_string(),
                });
            }
        }
        Ok(params)
    }

    /// Resolves the fields of `C` and builds it.
    pub fn evaluate<C: ModuleConfig>(
        &self,
        module: &str,
        local: &Record,
        selector: &Selector,
    ) -> ModuleResult<C> {
        let params = self.resolve(module, C::FIELDS, local, selector)?;
        C::from_params(&params)
    }
}

fn lookup_key<'a>(map: &'a Record, key: &str) -> Option<&'a Value> {
    let key = field_name_to_snake(key);
    map.fields()
        .iter()
        .find(|(name, _)| field_name_to_snake(name) == key)
        .map(|(_, value)| value)
}
