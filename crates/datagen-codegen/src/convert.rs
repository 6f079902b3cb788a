//! Scalar and sequence conversion to a target scalar kind.
//!
//! Only same-family conversions are legal: numeric to numeric (with `as`
//! widen/narrow/truncate semantics), bool to bool and string to string.

use crate::ctypes::{self, ScalarDescriptor};
use crate::error::{CodegenError, CodegenResult};
use crate::value::{KindFamily, Record, ScalarKind, Value};

/// Intermediate numeric representation used for casting.
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        Some(match *value {
            Value::Int8(v) => Number::Signed(v.into()),
            Value::Int16(v) => Number::Signed(v.into()),
            Value::Int32(v) => Number::Signed(v.into()),
            Value::Int64(v) => Number::Signed(v),
            Value::UInt8(v) => Number::Unsigned(v.into()),
            Value::UInt16(v) => Number::Unsigned(v.into()),
            Value::UInt32(v) => Number::Unsigned(v.into()),
            Value::UInt64(v) => Number::Unsigned(v),
            Value::Float32(v) => Number::Float(v.into()),
            Value::Float64(v) => Number::Float(v),
            _ => return None,
        })
    }

    fn cast(self, kind: ScalarKind) -> Value {
        macro_rules! cast {
            ($ty:ty) => {
                match self {
                    Number::Signed(v) => v as $ty,
                    Number::Unsigned(v) => v as $ty,
                    Number::Float(v) => v as $ty,
                }
            };
        }
        match kind {
            ScalarKind::Int8 => Value::Int8(cast!(i8)),
            ScalarKind::Int16 => Value::Int16(cast!(i16)),
            ScalarKind::Int32 => Value::Int32(cast!(i32)),
            ScalarKind::Int64 => Value::Int64(cast!(i64)),
            ScalarKind::UInt8 => Value::UInt8(cast!(u8)),
            ScalarKind::UInt16 => Value::UInt16(cast!(u16)),
            ScalarKind::UInt32 => Value::UInt32(cast!(u32)),
            ScalarKind::UInt64 => Value::UInt64(cast!(u64)),
            ScalarKind::Float32 => Value::Float32(cast!(f32)),
            ScalarKind::Float64 => Value::Float64(cast!(f64)),
            ScalarKind::Bool | ScalarKind::String => unreachable!("not a numeric kind"),
        }
    }
}

/// Converts a scalar value to the scalar type named `target`.
///
/// `target` may be a canonical name (`int16`) or a C spelling (`int16_t`).
pub fn scalar(value: &Value, target: &str) -> CodegenResult<Value> {
    if !value.is_scalar() {
        return Err(CodegenError::NotScalar {
            kind: value.shape_name(),
        });
    }
    let desc = ctypes::by_name(target)?;
    convert_scalar(value, desc)
}

/// Converts every leaf of a (possibly nested) sequence to `target`.
///
/// With an empty `target`, the leaves of each innermost sequence must share
/// one scalar kind and are returned unchanged.
pub fn sequence(value: &Value, target: &str) -> CodegenResult<Value> {
    let desc = resolve_target(target)?;
    convert_sequence(value, desc)
}

/// Converts every field of every record of a sequence to `target`.
///
/// All records must have the same field names, and every field must have
/// the same scalar kind. With an empty `target`, that common kind is kept.
pub fn sequence_of_records(value: &Value, target: &str) -> CodegenResult<Value> {
    let desc = resolve_target(target)?;
    let items = value.as_sequence().ok_or(CodegenError::NotSequence {
        kind: value.shape_name(),
    })?;
    let first = items
        .first()
        .ok_or(CodegenError::EmptyCannotInferType)?
        .as_record()
        .ok_or_else(|| CodegenError::NotRecord {
            kind: items[0].shape_name(),
        })?;
    let names: Vec<&str> = first.field_names().collect();
    let common = match first.fields().first() {
        Some((name, value)) => Some(field_kind(name, value)?),
        None => None,
    };

    let mut rv = Vec::with_capacity(items.len());
    for item in items {
        let record = item.as_record().ok_or(CodegenError::NotRecord {
            kind: item.shape_name(),
        })?;
        if !record.field_names().eq(names.iter().copied()) {
            return Err(CodegenError::RecordShapeMismatch {
                expected: names.join(", "),
                found: record.field_names().collect::<Vec<_>>().join(", "),
            });
        }

        let mut converted = Record::new();
        for (name, field) in record.fields() {
            let kind = field_kind(name, field)?;
            let common = common.unwrap_or(kind);
            if kind != common {
                return Err(CodegenError::FieldTypeMismatch {
                    field: name.clone(),
                    expected: ctypes::by_kind(common).ctype,
                    found: ctypes::by_kind(kind).ctype,
                });
            }
            let target = desc.unwrap_or_else(|| ctypes::by_kind(common));
            converted.push(name.clone(), convert_scalar(field, target)?);
        }
        rv.push(Value::Record(converted));
    }
    Ok(Value::Sequence(rv))
}

fn resolve_target(target: &str) -> CodegenResult<Option<&'static ScalarDescriptor>> {
    if target.is_empty() {
        Ok(None)
    } else {
        ctypes::by_name(target).map(Some)
    }
}

fn field_kind(name: &str, value: &Value) -> CodegenResult<ScalarKind> {
    value
        .scalar_kind()
        .ok_or_else(|| CodegenError::FieldTypeMismatch {
            field: name.to_string(),
            expected: "scalar",
            found: value.shape_name(),
        })
}

fn convert_scalar(value: &Value, desc: &'static ScalarDescriptor) -> CodegenResult<Value> {
    let from = ctypes::of_value(value)?;
    if from.kind.family() != desc.kind.family() {
        return Err(CodegenError::ConversionFailure {
            from: from.ctype,
            to: desc.ctype,
        });
    }
    match desc.kind.family() {
        KindFamily::Bool | KindFamily::String => Ok(value.clone()),
        KindFamily::Numeric => Number::of(value)
            .map(|n| n.cast(desc.kind))
            .ok_or(CodegenError::ConversionFailure {
                from: from.ctype,
                to: desc.ctype,
            }),
    }
}

fn convert_sequence(
    value: &Value,
    target: Option<&'static ScalarDescriptor>,
) -> CodegenResult<Value> {
    let items = value.as_sequence().ok_or(CodegenError::NotSequence {
        kind: value.shape_name(),
    })?;
    let first = items.first().ok_or(CodegenError::EmptyCannotInferType)?;

    match first {
        Value::Sequence(_) => items
            .iter()
            .map(|item| match item {
                Value::Sequence(_) => convert_sequence(item, target),
                other => Err(CodegenError::UnsupportedElementType {
                    expected: "sequence",
                    found: other.shape_name(),
                }),
            })
            .collect(),
        Value::Record(_) => Err(CodegenError::UnsupportedElementType {
            expected: "scalar",
            found: "record",
        }),
        _ => {
            let first_desc = ctypes::of_value(first)?;
            let desc = target.unwrap_or(first_desc);
            items
                .iter()
                .map(|item| match item.scalar_kind() {
                    Some(kind) if target.is_some() || kind == first_desc.kind => {
                        convert_scalar(item, desc)
                    }
                    _ => Err(CodegenError::UnsupportedElementType {
                        expected: first_desc.ctype,
                        found: item.shape_name(),
                    }),
                })
                .collect()
        }
    }
}
