//! Conversion of YAML nodes into code generation values.

use datagen_codegen::{Record, Value};
use serde_yaml::{Mapping, Number, Value as Yaml};

use super::error::{ConfigError, ConfigResult};

/// Returns the entries of a mapping section in document order.
///
/// A missing (`null`) section has no entries.
pub(crate) fn entries<'a>(node: &'a Yaml, context: &str) -> ConfigResult<Vec<(&'a str, &'a Yaml)>> {
    match node {
        Yaml::Null => Ok(Vec::new()),
        Yaml::Mapping(mapping) => mapping
            .iter()
            .map(|(key, value)| {
                key.as_str()
                    .map(|key| (key, value))
                    .ok_or_else(|| ConfigError::NonStringKey {
                        context: context.to_string(),
                    })
            })
            .collect(),
        _ => Err(ConfigError::NotMapping {
            context: context.to_string(),
        }),
    }
}

/// Converts a top-level value node; `null` is the absent value.
pub(crate) fn to_value(node: &Yaml, context: &str) -> ConfigResult<Option<Value>> {
    match node {
        Yaml::Null => Ok(None),
        node => convert(node, context).map(Some),
    }
}

/// Converts a mapping of parameters into a record, keeping key order.
pub(crate) fn to_record(node: &Yaml, context: &str) -> ConfigResult<Record> {
    let mut record = Record::new();
    for (key, value) in entries(node, context)? {
        record.push(key, convert(value, context)?);
    }
    Ok(record)
}

fn convert(node: &Yaml, context: &str) -> ConfigResult<Value> {
    Ok(match node {
        Yaml::Null => {
            return Err(ConfigError::NestedNull {
                context: context.to_string(),
            })
        }
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => number(n),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| convert(item, context))
                .collect::<ConfigResult<_>>()?,
        ),
        Yaml::Mapping(mapping) => Value::Record(mapping_record(mapping, context)?),
        Yaml::Tagged(tagged) => {
            return Err(ConfigError::Tagged {
                context: context.to_string(),
                tag: tagged.tag.to_string(),
            })
        }
    })
}

fn mapping_record(mapping: &Mapping, context: &str) -> ConfigResult<Record> {
    let mut record = Record::new();
    for (key, value) in mapping {
        let key = key.as_str().ok_or_else(|| ConfigError::NonStringKey {
            context: context.to_string(),
        })?;
        record.push(key, convert(value, context)?);
    }
    Ok(record)
}

/// Integers take the narrowest of `int32`, `int64` and `uint64`.
fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        i32::try_from(i).map_or(Value::Int64(i), Value::Int32)
    } else if let Some(u) = n.as_u64() {
        Value::UInt64(u)
    } else {
        Value::Float64(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Yaml {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(to_value(&yaml("42"), "t").unwrap(), Some(Value::Int32(42)));
        assert_eq!(
            to_value(&yaml("-3000000000"), "t").unwrap(),
            Some(Value::Int64(-3_000_000_000))
        );
        assert_eq!(
            to_value(&yaml("18446744073709551615"), "t").unwrap(),
            Some(Value::UInt64(u64::MAX))
        );
        assert_eq!(to_value(&yaml("1.5"), "t").unwrap(), Some(Value::Float64(1.5)));
    }

    #[test]
    fn test_scalars_and_sequences() {
        assert_eq!(to_value(&yaml("true"), "t").unwrap(), Some(Value::Bool(true)));
        assert_eq!(
            to_value(&yaml("foo"), "t").unwrap(),
            Some(Value::String("foo".into()))
        );
        assert_eq!(
            to_value(&yaml("[1, [2, 3]]"), "t").unwrap(),
            Some(Value::Sequence(vec![
                Value::Int32(1),
                Value::Sequence(vec![Value::Int32(2), Value::Int32(3)]),
            ]))
        );
    }

    #[test]
    fn test_top_level_null_is_absent() {
        assert_eq!(to_value(&yaml("~"), "t").unwrap(), None);
    }

    #[test]
    fn test_nested_null_rejected() {
        let err = to_value(&yaml("[1, ~]"), "variables: x").unwrap_err();
        assert_eq!(err.to_string(), "config: variables: x: null inside value");
        assert_eq!(err.code(), "CONFIG_008");
    }

    #[test]
    fn test_mapping_keeps_key_order() {
        let value = to_value(&yaml("{z: 1, a: 2, m: 3}"), "t").unwrap().unwrap();
        let names: Vec<_> = value.as_record().unwrap().field_names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = to_record(&yaml("{1: a}"), "global_parameters").unwrap_err();
        assert!(matches!(err, ConfigError::NonStringKey { .. }));
    }

    #[test]
    fn test_tagged_rejected() {
        let err = to_value(&yaml("!foo 1"), "t").unwrap_err();
        assert!(matches!(err, ConfigError::Tagged { ref tag, .. } if tag == "!foo"));
    }

    #[test]
    fn test_entries_of_non_mapping() {
        let err = entries(&yaml("[a, b]"), "macros").unwrap_err();
        assert_eq!(err.to_string(), "config: macros: not a mapping");
        assert!(entries(&Yaml::Null, "macros").unwrap().is_empty());
    }
}
