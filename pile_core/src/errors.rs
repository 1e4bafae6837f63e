//! # Error Types
//!
//! Structured error types for pile_core. Every failure names the field, table
//! key or depth involved so a caller can report exactly what is unconfigured
//! or out of range.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(tip_area_m2: f64) -> CalcResult<()> {
//!     if tip_area_m2 <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "tip_area_m2".to_string(),
//!             value: tip_area_m2.to_string(),
//!             reason: "Tip area must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pile_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-numeric, empty profile, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A soil or execution-type key is absent from a required coefficient table
    #[error("Missing coefficient '{coefficient}' for '{key}' in {table} table")]
    MissingCoefficient {
        table: String,
        coefficient: String,
        key: String,
    },

    /// A depth falls outside the surveyed profile
    #[error("Data incomplete: depth {depth_m:.2} m is outside the surveyed profile (bottom at {profile_bottom_m:.2} m)")]
    OutOfRangeDepth { depth_m: f64, profile_bottom_m: f64 },

    /// A named record (borehole, calculation item) does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

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
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingCoefficient error
    pub fn missing_coefficient(
        table: impl Into<String>,
        coefficient: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        CalcError::MissingCoefficient {
            table: table.into(),
            coefficient: coefficient.into(),
            key: key.into(),
        }
    }

    /// Create an OutOfRangeDepth error
    pub fn out_of_range_depth(depth_m: f64, profile_bottom_m: f64) -> Self {
        CalcError::OutOfRangeDepth {
            depth_m,
            profile_bottom_m,
        }
    }

    /// Create a NotFound error
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingCoefficient { .. } => "MISSING_COEFFICIENT",
            CalcError::OutOfRangeDepth { .. } => "OUT_OF_RANGE_DEPTH",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}
