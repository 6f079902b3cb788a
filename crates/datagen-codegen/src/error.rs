//! Error types for value conversion and C code generation.

use thiserror::Error;

/// Result type for code generation operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while converting or rendering values.
///
/// Every error is terminal for the declaration being built: there is no
/// partial recovery.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The value is absent.
    #[error("got null value")]
    NullValue,

    /// The value shape has no C representation in this context.
    #[error("unsupported value type: {kind}")]
    UnsupportedType {
        /// Shape of the offending value.
        kind: &'static str,
    },

    /// The type name does not match any entry of the type registry.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A scalar was expected.
    #[error("not a scalar: {kind}")]
    NotScalar {
        /// Shape of the offending value.
        kind: &'static str,
    },

    /// A sequence was expected.
    #[error("not a sequence: {kind}")]
    NotSequence {
        /// Shape of the offending value.
        kind: &'static str,
    },

    /// A record was expected.
    #[error("not a record: {kind}")]
    NotRecord {
        /// Shape of the offending value.
        kind: &'static str,
    },

    /// The value kind family differs from the target kind family.
    #[error("value of type {from} cannot be converted to type {to}")]
    ConversionFailure {
        /// Source type name.
        from: &'static str,
        /// Target type name.
        to: &'static str,
    },

    /// An empty sequence was found where its element type had to be inferred.
    #[error("incomplete value, failed to detect type of empty sequence")]
    EmptyCannotInferType,

    /// Sibling sequences at the same depth have different lengths.
    #[error("multidimensional sequences must be rectangular (depth {depth}: expected {expected}, found {found})")]
    NonRectangular {
        /// Nesting depth of the mismatch.
        depth: usize,
        /// Length recorded for the depth.
        expected: usize,
        /// Length of the offending sequence.
        found: usize,
    },

    /// Sequence elements do not share a single supported kind.
    #[error("unsupported element type: {found} (expected {expected})")]
    UnsupportedElementType {
        /// Kind the element was expected to have.
        expected: &'static str,
        /// Kind of the offending element.
        found: &'static str,
    },

    /// A record field kind differs from the common field kind.
    #[error("field '{field}' has type {found}, expected {expected}")]
    FieldTypeMismatch {
        /// Field name.
        field: String,
        /// Common field type.
        expected: &'static str,
        /// Offending field type.
        found: &'static str,
    },

    /// Records of one sequence do not share the same field names.
    #[error("record fields do not match: expected [{expected}], found [{found}]")]
    RecordShapeMismatch {
        /// Field names of the first record.
        expected: String,
        /// Field names of the offending record.
        found: String,
    },

    /// A string does not fit the requested fixed width.
    #[error("width overflow: {value:?} ({len} > {width})")]
    WidthOverflow {
        /// The offending string.
        value: String,
        /// Its length in bytes.
        len: usize,
        /// The requested width.
        width: usize,
    },

    /// An infinite or NaN float was rendered.
    #[error("float value {value} has no C literal")]
    NonFiniteFloat {
        /// The offending value.
        value: String,
    },

    /// Writing generated text failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    /// Returns a stable short code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            CodegenError::NullValue => "CODEGEN_001",
            CodegenError::UnsupportedType { .. } => "CODEGEN_002",
            CodegenError::UnknownType(_) => "CODEGEN_003",
            CodegenError::NotScalar { .. } => "CODEGEN_004",
            CodegenError::NotSequence { .. } => "CODEGEN_005",
            CodegenError::NotRecord { .. } => "CODEGEN_006",
            CodegenError::ConversionFailure { .. } => "CODEGEN_007",
            CodegenError::EmptyCannotInferType => "CODEGEN_008",
            CodegenError::NonRectangular { .. } => "CODEGEN_009",
            CodegenError::UnsupportedElementType { .. } => "CODEGEN_010",
            CodegenError::FieldTypeMismatch { .. } => "CODEGEN_011",
            CodegenError::RecordShapeMismatch { .. } => "CODEGEN_012",
            CodegenError::WidthOverflow { .. } => "CODEGEN_013",
            CodegenError::Io(_) => "CODEGEN_014",
            CodegenError::NonFiniteFloat { .. } => "CODEGEN_015",
        }
    }
}
