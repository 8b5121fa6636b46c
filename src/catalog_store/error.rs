//! Error taxonomy for catalog operations.
//!
//! Every fallible catalog operation surfaces one of these variants; the
//! server boundary maps them to HTTP statuses and stable error codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation collides with existing state (duplicate name,
    /// duplicate playlist membership).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure from the persistence layer.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    /// Stable machine-readable code, independent of the message text.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation_error",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::Conflict(_) => "conflict",
            CatalogError::Store(_) => "store_error",
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Store(e.into())
    }
}

/// Map a failed insert to `Conflict` when it tripped a uniqueness
/// constraint, `Store` otherwise.
pub(crate) fn insert_error(e: rusqlite::Error, what: &str) -> CatalogError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            CatalogError::Conflict(format!("{} already exists", what))
        }
        _ => CatalogError::Store(e.into()),
    }
}
