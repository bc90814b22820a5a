//! Structural errors raised by reader and writer sessions.
//!
//! Public functions in this crate return [`anyhow::Result`]. Structural
//! failures are raised as a [`CsvError`] and can be recovered from the
//! `anyhow::Error` with [`downcast_ref`](anyhow::Error::downcast_ref):
//!
//! ```
//! use slashcsv::CsvError;
//!
//! let err = anyhow::Error::new(CsvError::NoCurrentRecord);
//! assert!(matches!(err.downcast_ref::<CsvError>(), Some(CsvError::NoCurrentRecord)));
//! ```
//!
//! Per-cell conversion failures are not errors. A cell that fails to convert
//! leaves its field at the default value.

use thiserror::Error;

/// Error type for session-level failures.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidModel` | A record type declares no fields or repeats a field name |
/// | `UnknownColumn` | A header cell matches no field, exactly or in PascalCase |
/// | `SessionAlreadyStarted` | A window option is changed after the header was read |
/// | `NoCurrentRecord` | The current record is requested before a successful read |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    /// The record type cannot be bound to CSV columns.
    #[error("invalid record model '{model}': {reason}")]
    InvalidModel {
        /// Rust type name of the record.
        model: &'static str,
        /// What is wrong with its field table.
        reason: String,
    },

    /// A header cell could not be matched to any field.
    #[error("no field matches CSV header '{column}'")]
    UnknownColumn {
        /// The raw header text.
        column: String,
    },

    /// A window option was changed after parsing began.
    #[error("option '{option}' can only be set before the first read")]
    SessionAlreadyStarted {
        /// Name of the rejected option.
        option: &'static str,
    },

    /// No record has been read yet.
    #[error("no current record: call `read` first")]
    NoCurrentRecord,
}
