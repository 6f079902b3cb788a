//! Error types for configuration loading.

use std::path::PathBuf;

use datagen_codegen::CodegenError;
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading a configuration file.
///
/// `context` fields name the section and entry being decoded, for example
/// `macros: FOO`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("config: failed to read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A section that must be a mapping is something else.
    #[error("config: {context}: not a mapping")]
    NotMapping {
        /// Section being decoded.
        context: String,
    },

    /// A mapping key is not a string.
    #[error("config: {context}: mapping key is not a string")]
    NonStringKey {
        /// Section being decoded.
        context: String,
    },

    /// An entry does not match its expected layout.
    #[error("config: {context}: {source}")]
    InvalidEntry {
        /// Entry being decoded.
        context: String,
        /// Underlying decode error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A macro value is not a scalar.
    #[error("config: {context}: value is not a scalar")]
    MacroNotScalar {
        /// Entry being decoded.
        context: String,
    },

    /// A typed variable holds a value that cannot be converted.
    #[error("config: {context}: unsupported value")]
    UnsupportedVariable {
        /// Entry being decoded.
        context: String,
    },

    /// A `null` appears inside a composite value.
    #[error("config: {context}: null inside value")]
    NestedNull {
        /// Entry being decoded.
        context: String,
    },

    /// A tagged YAML value was found.
    #[error("config: {context}: tagged values are not supported ({tag})")]
    Tagged {
        /// Entry being decoded.
        context: String,
        /// The tag.
        tag: String,
    },

    /// A typed value failed to convert.
    #[error("config: {context}: {source}")]
    Conversion {
        /// Entry being decoded.
        context: String,
        /// Underlying conversion error.
        #[source]
        source: CodegenError,
    },

    /// An `eval`/`eval_env` expression failed to evaluate or convert.
    #[error("config: {context}: eval: {message}")]
    Eval {
        /// Entry being decoded.
        context: String,
        /// Evaluation error message.
        message: String,
    },
}

impl ConfigError {
    /// Returns a stable short code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_001",
            ConfigError::Yaml(_) => "CONFIG_002",
            ConfigError::NotMapping { .. } => "CONFIG_003",
            ConfigError::NonStringKey { .. } => "CONFIG_004",
            ConfigError::InvalidEntry { .. } => "CONFIG_005",
            ConfigError::MacroNotScalar { .. } => "CONFIG_006",
            ConfigError::UnsupportedVariable { .. } => "CONFIG_007",
            ConfigError::NestedNull { .. } => "CONFIG_008",
            ConfigError::Tagged { .. } => "CONFIG_009",
            ConfigError::Conversion { .. } => "CONFIG_010",
            ConfigError::Eval { .. } => "CONFIG_011",
        }
    }

    pub(crate) fn eval(context: &str, err: impl std::fmt::Display) -> Self {
        ConfigError::Eval {
            context: context.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn conversion(context: &str, source: CodegenError) -> Self {
        ConfigError::Conversion {
            context: context.to_string(),
            source,
        }
    }
}
