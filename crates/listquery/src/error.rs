//! Error types for the listquery crate.
//!
//! The query pipeline itself never fails; these cover the surrounding
//! operations that can.

use thiserror::Error;

/// Errors raised by parameter construction and the in-memory store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListQueryError {
    /// Parameters were supplied as a JSON value that is not an object.
    #[error("query params must be a JSON object, got {0}")]
    InvalidParams(&'static str),

    /// A record's id field is absent or normalizes to an empty key.
    #[error("record has no usable value in id field '{field}'")]
    MissingId { field: String },

    /// A record with the same normalized id is already stored.
    #[error("record with id '{0}' already exists")]
    DuplicateId(String),

    /// An edit changed the id of a stored record.
    #[error("edit changed record id from '{from}' to '{to}'")]
    IdChanged { from: String, to: String },

    /// No record has the given normalized id.
    #[error("record with id '{0}' not found")]
    NotFound(String),
}

/// Result type for listquery operations.
pub type Result<T> = std::result::Result<T, ListQueryError>;
