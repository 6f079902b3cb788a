//! Dynamically-shaped values flowing from configuration and DSP modules into
//! the code generator.
//!
//! A [`Value`] is a closed tree: scalar leaves of a fixed set of kinds, plus
//! ordered sequences and ordered records.

use std::fmt;

/// Kind of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
}

impl ScalarKind {
    /// All scalar kinds, in registry order.
    pub const ALL: [ScalarKind; 12] = [
        ScalarKind::Bool,
        ScalarKind::Int8,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::UInt8,
        ScalarKind::UInt16,
        ScalarKind::UInt32,
        ScalarKind::UInt64,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::String,
    ];

    /// Returns the family used to decide which conversions are legal.
    pub fn family(self) -> KindFamily {
        match self {
            ScalarKind::Bool => KindFamily::Bool,
            ScalarKind::String => KindFamily::String,
            _ => KindFamily::Numeric,
        }
    }

    /// Byte width of integer kinds, `None` for everything else.
    pub fn int_width(self) -> Option<usize> {
        match self {
            ScalarKind::Int8 | ScalarKind::UInt8 => Some(1),
            ScalarKind::Int16 | ScalarKind::UInt16 => Some(2),
            ScalarKind::Int32 | ScalarKind::UInt32 => Some(4),
            ScalarKind::Int64 | ScalarKind::UInt64 => Some(8),
            _ => None,
        }
    }
}

/// Conversion family of a scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFamily {
    Bool,
    Numeric,
    String,
}

/// Ordered list of named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.push(name, value);
        }
        record
    }
}

/// A scalar, sequence or record value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Sequence(Vec<Value>),
    Record(Record),
}

impl Value {
    /// Returns the scalar kind of a leaf, `None` for sequences and records.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Int8(_) => Some(ScalarKind::Int8),
            Value::Int16(_) => Some(ScalarKind::Int16),
            Value::Int32(_) => Some(ScalarKind::Int32),
            Value::Int64(_) => Some(ScalarKind::Int64),
            Value::UInt8(_) => Some(ScalarKind::UInt8),
            Value::UInt16(_) => Some(ScalarKind::UInt16),
            Value::UInt32(_) => Some(ScalarKind::UInt32),
            Value::UInt64(_) => Some(ScalarKind::UInt64),
            Value::Float32(_) => Some(ScalarKind::Float32),
            Value::Float64(_) => Some(ScalarKind::Float64),
            Value::String(_) => Some(ScalarKind::String),
            Value::Sequence(_) | Value::Record(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar_kind().is_some()
    }

    /// Short human-readable name of the value shape, for error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
            other => match other.scalar_kind() {
                Some(kind) => crate::ctypes::by_kind(kind).name,
                None => "unknown",
            },
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Plain textual form: decimal numbers, bare strings, shortest round-trip floats.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (idx, (_, value)) in record.fields().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().map(Into::into).collect())
    }
}
