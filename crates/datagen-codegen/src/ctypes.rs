//! Type registry: the catalog of supported C scalar types.
//!
//! Each [`ScalarKind`] has exactly one [`ScalarDescriptor`] holding its
//! canonical name, the C spelling emitted into headers and the formatting
//! strategy used to render literals.

use crate::error::{CodegenError, CodegenResult};
use crate::value::{ScalarKind, Value};

/// How a scalar is rendered as C literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStrategy {
    /// Default textual form (booleans and floats).
    Print,
    /// Double-quoted, escaped string.
    Quote,
    /// Decimal, or fixed-width two's-complement hex when requested.
    Value,
}

/// Immutable description of one scalar kind.
#[derive(Debug)]
pub struct ScalarDescriptor {
    /// Leaf kind described.
    pub kind: ScalarKind,
    /// Canonical name (`int32`, `float64`, ...).
    pub name: &'static str,
    /// C type spelling (`int32_t`, `double`, ...).
    pub ctype: &'static str,
    /// Whether the kind belongs to the numeric family.
    pub is_numeric: bool,
    /// Literal formatting strategy.
    pub format: FormatStrategy,
    /// Zero value of the kind, the witness used as conversion target.
    pub zero: fn() -> Value,
}

macro_rules! descriptor {
    ($kind:ident, $name:literal, $ctype:literal, $numeric:literal, $format:ident, $zero:expr) => {
        ScalarDescriptor {
            kind: ScalarKind::$kind,
            name: $name,
            ctype: $ctype,
            is_numeric: $numeric,
            format: FormatStrategy::$format,
            zero: || $zero,
        }
    };
}

static DESCRIPTORS: [ScalarDescriptor; 12] = [
    descriptor!(Bool, "bool", "bool", false, Print, Value::Bool(false)),
    descriptor!(Int8, "int8", "int8_t", true, Value, Value::Int8(0)),
    descriptor!(Int16, "int16", "int16_t", true, Value, Value::Int16(0)),
    descriptor!(Int32, "int32", "int32_t", true, Value, Value::Int32(0)),
    descriptor!(Int64, "int64", "int64_t", true, Value, Value::Int64(0)),
    descriptor!(UInt8, "uint8", "uint8_t", true, Value, Value::UInt8(0)),
    descriptor!(UInt16, "uint16", "uint16_t", true, Value, Value::UInt16(0)),
    descriptor!(UInt32, "uint32", "uint32_t", true, Value, Value::UInt32(0)),
    descriptor!(UInt64, "uint64", "uint64_t", true, Value, Value::UInt64(0)),
    descriptor!(Float32, "float32", "float", true, Print, Value::Float32(0.0)),
    descriptor!(Float64, "float64", "double", true, Print, Value::Float64(0.0)),
    descriptor!(String, "string", "char*", false, Quote, Value::String(String::new())),
];

/// Returns the descriptor of a scalar kind.
pub fn by_kind(kind: ScalarKind) -> &'static ScalarDescriptor {
    let idx = match kind {
        ScalarKind::Bool => 0,
        ScalarKind::Int8 => 1,
        ScalarKind::Int16 => 2,
        ScalarKind::Int32 => 3,
        ScalarKind::Int64 => 4,
        ScalarKind::UInt8 => 5,
        ScalarKind::UInt16 => 6,
        ScalarKind::UInt32 => 7,
        ScalarKind::UInt64 => 8,
        ScalarKind::Float32 => 9,
        ScalarKind::Float64 => 10,
        ScalarKind::String => 11,
    };
    &DESCRIPTORS[idx]
}

/// Returns the descriptor of a value's leaf kind.
///
/// Sequences and records have no descriptor.
pub fn of_value(value: &Value) -> CodegenResult<&'static ScalarDescriptor> {
    value
        .scalar_kind()
        .map(by_kind)
        .ok_or(CodegenError::UnsupportedType {
            kind: value.shape_name(),
        })
}

/// Resolves a type name, either canonical (`int32`) or C spelling (`int32_t`).
pub fn by_name(name: &str) -> CodegenResult<&'static ScalarDescriptor> {
    let name = name.trim();
    DESCRIPTORS
        .iter()
        .find(|desc| desc.name == name || desc.ctype == name)
        .ok_or_else(|| CodegenError::UnknownType(name.to_string()))
}

/// Renders a scalar value as C literal text.
///
/// With `hex`, integers are written as zero-padded lowercase hex whose digit
/// count is twice the byte width, using the two's-complement bit pattern.
/// Floats, booleans and strings ignore `hex`.
pub fn format(value: &Value, hex: bool) -> CodegenResult<String> {
    let desc = of_value(value)?;
    Ok(match desc.format {
        FormatStrategy::Print => {
            check_finite(value)?;
            value.to_string()
        }
        FormatStrategy::Quote => quote(value.as_str().unwrap_or_default()),
        FormatStrategy::Value if !hex => value.to_string(),
        FormatStrategy::Value => match *value {
            Value::Int8(v) => format!("0x{:02x}", v as u8),
            Value::UInt8(v) => format!("0x{:02x}", v),
            Value::Int16(v) => format!("0x{:04x}", v as u16),
            Value::UInt16(v) => format!("0x{:04x}", v),
            Value::Int32(v) => format!("0x{:08x}", v as u32),
            Value::UInt32(v) => format!("0x{:08x}", v),
            Value::Int64(v) => format!("0x{:016x}", v as u64),
            Value::UInt64(v) => format!("0x{:016x}", v),
            _ => value.to_string(),
        },
    })
}

/// Fails for infinite and NaN floats, which have no C literal.
pub(crate) fn check_finite(value: &Value) -> CodegenResult<()> {
    let finite = match *value {
        Value::Float32(v) => v.is_finite(),
        Value::Float64(v) => v.is_finite(),
        _ => true,
    };
    if finite {
        Ok(())
    } else {
        Err(CodegenError::NonFiniteFloat {
            value: value.to_string(),
        })
    }
}

/// Double-quotes a string using C escape sequences.
///
/// Other control bytes become three-digit octal escapes, so a following
/// digit is never read as part of the escape.
fn quote(s: &str) -> String {
    let mut rv = String::with_capacity(s.len() + 2);
    rv.push('"');
    for c in s.chars() {
        match c {
            '"' => rv.push_str("\\\""),
            '\\' => rv.push_str("\\\\"),
            '\n' => rv.push_str("\\n"),
            '\r' => rv.push_str("\\r"),
            '\t' => rv.push_str("\\t"),
            '\x07' => rv.push_str("\\a"),
            '\x08' => rv.push_str("\\b"),
            '\x0b' => rv.push_str("\\v"),
            '\x0c' => rv.push_str("\\f"),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    rv.push_str(&format!("\\{:03o}", byte));
                }
            }
            c => rv.push(c),
        }
    }
    rv.push('"');
    rv
}
