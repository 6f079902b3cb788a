//! Error types for parameter resolution and DSP modules.

use datagen_codegen::CodegenError;
use thiserror::Error;

/// Result type for module operations.
pub type ModuleResult<T> = Result<T, ModuleError>;

/// Errors that can occur while resolving parameters or rendering a module.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// No module with this name exists.
    #[error("module not found: {0}")]
    UnknownModule(String),

    /// The module declares no selectors.
    #[error("selector: no selector allowed")]
    NoSelectorAllowed,

    /// A requested selector is not in the module's allowed list.
    #[error("selector: {0:?} selected but not allowed")]
    SelectorNotAllowed(String),

    /// A parameter could not be resolved from local or global parameters.
    #[error("parameter not defined: {name} ({reason})")]
    ParameterNotDefined {
        /// Snake-case parameter name.
        name: String,
        /// Why the parameter is needed.
        reason: String,
    },

    /// A parameter has the wrong type.
    #[error("invalid parameter value type: {name}: parameter is {found}, wants {expected}")]
    InvalidParameterType {
        /// Snake-case parameter name.
        name: String,
        /// Expected type name.
        expected: &'static str,
        /// Found value shape.
        found: &'static str,
    },

    /// A parameter value is out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Snake-case parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Value conversion or rendering failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl ModuleError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns a stable short code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            ModuleError::UnknownModule(_) => "MODULE_001",
            ModuleError::NoSelectorAllowed => "MODULE_002",
            ModuleError::SelectorNotAllowed(_) => "MODULE_003",
            ModuleError::ParameterNotDefined { .. } => "MODULE_004",
            ModuleError::InvalidParameterType { .. } => "MODULE_005",
            ModuleError::InvalidParameter { .. } => "MODULE_006",
            ModuleError::Codegen(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_messages() {
        assert_eq!(
            ModuleError::NoSelectorAllowed.to_string(),
            "selector: no selector allowed"
        );
        assert_eq!(
            ModuleError::SelectorNotAllowed("c".into()).to_string(),
            "selector: \"c\" selected but not allowed"
        );
    }

    #[test]
    fn test_codegen_code_passthrough() {
        let err: ModuleError = CodegenError::EmptyCannotInferType.into();
        assert_eq!(err.code(), "CODEGEN_008");
        assert_eq!(
            err.to_string(),
            "incomplete value, failed to detect type of empty sequence"
        );
    }

    #[test]
    fn test_invalid_param_helper() {
        let err = ModuleError::invalid_param("samples", "must be at least 2");
        assert_eq!(err.code(), "MODULE_006");
        assert_eq!(err.to_string(), "invalid parameter 'samples': must be at least 2");
    }
}
