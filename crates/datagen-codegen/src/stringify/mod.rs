//! Stringify engine: renders a [`Value`] tree as C initializer text.
//!
//! One top-level value is rendered with a fresh [`TypeSpec`] accumulator.
//! While recursing, the engine:
//!
//! - records the C type of the scalars it formats,
//! - freezes the field layout of the first record it meets,
//! - collects one length per sequence depth and rejects ragged sequences.
//!
//! All integer literals are emitted as fixed-width hex.

mod pretty;
mod record;
mod sequence;


pub use pretty::{dump_values, lpadding, LINE_WIDTH};

use crate::ctypes::{self, ScalarDescriptor};
use crate::error::{CodegenError, CodegenResult};
use crate::value::Value;

/// Type information accumulated while rendering one top-level value.
#[derive(Debug, Default)]
pub struct TypeSpec {
    /// C type of the last scalar formatted, if any.
    pub ctype: Option<&'static str>,
    /// Field layout frozen from the first record with scalar fields.
    pub fields: Vec<(String, &'static ScalarDescriptor)>,
    /// Sequence length per nesting depth.
    pub dims: Vec<usize>,
}

impl TypeSpec {
    /// Returns the element C type: the recorded scalar type, or an
    /// anonymous struct synthesized from the frozen field layout.
    pub fn element_ctype(&self) -> String {
        if let Some(ctype) = self.ctype {
            return ctype.to_string();
        }
        record::struct_type(&self.fields)
    }
}

/// Output of [`stringify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stringified {
    /// C initializer text.
    pub data: String,
    /// Element C type.
    pub ctype: String,
    /// Length per sequence depth, outermost first.
    pub dims: Vec<usize>,
}

/// Renders a value as C initializer text, inferring its element type and
/// dimensions.
pub fn stringify<'a>(value: impl Into<Option<&'a Value>>) -> CodegenResult<Stringified> {
    let value = value.into().ok_or(CodegenError::NullValue)?;
    let mut spec = TypeSpec::default();
    let data = stringify_at(value, 0, &mut spec)?;
    Ok(Stringified {
        data,
        ctype: spec.element_ctype(),
        dims: spec.dims,
    })
}

/// Renders a single scalar as C literal text.
///
/// Sequences and records are rejected with [`CodegenError::UnsupportedType`].
pub fn stringify_value<'a>(value: impl Into<Option<&'a Value>>, hex: bool) -> CodegenResult<String> {
    let value = value.into().ok_or(CodegenError::NullValue)?;
    ctypes::format(value, hex)
}

pub(crate) fn stringify_at(value: &Value, depth: usize, spec: &mut TypeSpec) -> CodegenResult<String> {
    match value {
        Value::Record(rec) => Ok(record::stringify_record(rec, depth, spec)),
        Value::Sequence(items) => sequence::stringify_sequence(items, depth, spec),
        scalar => {
            let desc = ctypes::of_value(scalar)?;
            spec.ctype = Some(desc.ctype);
            ctypes::format(scalar, true)
        }
    }
}
