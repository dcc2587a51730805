//! # Error Types
//!
//! Structured error types for ledcalc_core. The calculation engine itself is
//! total and never fails; these errors come from validation, catalog lookups,
//! project files and the external text services.
//!
//! ## Example
//!
//! ```rust
//! use ledcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_mm: f64) -> CalcResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "width_mm".to_string(),
//!             value: width_mm.to_string(),
//!             reason: "Module width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(500.0).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ledcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for everything around the calculation.
///
/// Each variant carries enough context to be shown to a user or handled
/// programmatically after a JSON round trip.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The selected module is not in the catalog
    #[error("Module not found: {module_id}")]
    ModuleNotFound { module_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// An external text service (safety advisory, spec lookup) failed or
    /// returned something unusable
    #[error("Service '{service}' failed: {reason}")]
    ServiceFailed { service: String, reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ModuleNotFound error
    pub fn module_not_found(module_id: impl Into<String>) -> Self {
        CalcError::ModuleNotFound {
            module_id: module_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a ServiceFailed error
    pub fn service_failed(service: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ServiceFailed {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. } | CalcError::ServiceFailed { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ModuleNotFound { .. } => "MODULE_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::ServiceFailed { .. } => "SERVICE_FAILED",
        }
    }
}
