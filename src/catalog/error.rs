//! Catalog error types.

use thiserror::Error;

/// Result type for catalog lookups.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while resolving columns.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No column with this key exists.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// No column with this id exists.
    #[error("unknown column id: {0}")]
    UnknownColumnId(u32),

    /// The catalog document could not be parsed.
    #[error("failed to parse column catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("failed to read column catalog: {0}")]
    Io(#[from] std::io::Error),
}
