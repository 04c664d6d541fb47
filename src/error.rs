//! Error types for catalog operations.
//!
//! This module provides the [`CatalogError`] type for all engine operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all catalog engine operations.
///
/// Represents the conditions that can occur while decoding stored records,
/// assembling them, or consulting the row source. Absent data is never an
/// error: lookups that find nothing return `None` or an empty collection.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Error indicating an invalid or malformed stored record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error indicating a record is missing a field the engine relies on,
    /// such as the 001 control number of a holding record.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Failure reported by the underlying row source or its connection.
    #[error("Source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    /// Wraps an arbitrary provider failure in the [`CatalogError::Source`]
    /// variant.
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CatalogError::Source(Box::new(err))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
