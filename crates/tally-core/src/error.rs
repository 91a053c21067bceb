//! Errors raised by an aggregation run.

use thiserror::Error;

use crate::types::{LogKey, ValidationError};

/// Structural input errors. Either one aborts the whole `build` call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// A rule names a field that logs do not have.
    #[error("invalid rule field: {field:?} (expected issue, comment or time)")]
    InvalidField { field: String },

    /// A log is reachable from itself through its dependency entries.
    #[error("cyclic dependency through log {key}")]
    CyclicDependency { key: LogKey },
}

/// Failure to ingest a batch of raw import rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Row `row` (1-based) failed validation.
    #[error("invalid import row {row}")]
    Row {
        row: usize,
        #[source]
        source: ValidationError,
    },
}
