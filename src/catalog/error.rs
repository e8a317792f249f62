use thiserror::Error;

/// Classified failures of catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// A listing or search produced no items.
    #[error("{0}")]
    EmptyResult(String),

    /// Storage failed. Carries a human-readable message only, the cause is
    /// logged where the failure is translated.
    #[error("{0}")]
    StorageFailure(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{0}")]
    InvalidSong(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
