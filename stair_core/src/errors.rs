//! # Error Types
//!
//! Structured error types for stair_core. The calculator itself never
//! fails; these errors come from caller-side validation, scale ratio
//! construction and the project store's file operations.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::errors::{StairError, StairResult};
//!
//! fn validate_height(total_height: f64) -> StairResult<()> {
//!     if total_height <= 0.0 {
//!         return Err(StairError::InvalidInput {
//!             field: "total_height".to_string(),
//!             value: total_height.to_string(),
//!             reason: "Total height must be greater than 0".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for stair_core operations
pub type StairResult<T> = Result<T, StairError>;

/// Structured error type for stair_core operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum StairError {
    /// An input value is invalid (out of range, zero ratio, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Store file is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// Could not encode data for writing
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Stored content is malformed or corrupt
    #[error("Deserialization error in '{path}': {reason}")]
    Deserialization { path: String, reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl StairError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        StairError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        StairError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        StairError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a Deserialization error
    pub fn deserialization(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StairError::Deserialization {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether a store load should treat this error as "start with an empty list".
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            StairError::Deserialization { .. } | StairError::VersionMismatch { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StairError::InvalidInput { .. } => "INVALID_INPUT",
            StairError::FileError { .. } => "FILE_ERROR",
            StairError::FileLocked { .. } => "FILE_LOCKED",
            StairError::Serialization { .. } => "SERIALIZATION_ERROR",
            StairError::Deserialization { .. } => "DESERIALIZATION_ERROR",
            StairError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
