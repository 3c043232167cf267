//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only hard failures live here. Recoverable anomalies (unsupported formats,
//! skipped multipart fields, dangling references) are reported through the
//! diagnostics channel instead, see [`crate::diagnostics`].

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document (or config) could not be read as YAML.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// The document (or config) could not be read as JSON.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// A `$ref` string that is not of the form `#/<kind>/<name>`.
    #[from(ignore)]
    #[display("Invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// The raw reference string.
        reference: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An operation with a body or form parameters declares no consume mime type.
    #[from(ignore)]
    #[display("Operation '{operation}' at '{path}' has a body but no consumes mime type")]
    MissingConsumes {
        /// Function name of the offending operation.
        operation: String,
        /// The path template it lives under.
        path: String,
    },

    /// The document is not a Swagger 2.x document.
    #[from(ignore)]
    #[display("Unsupported document version: {_0}")]
    UnsupportedVersion(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Shorthand for [`AppError::InvalidReference`].
    pub fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
