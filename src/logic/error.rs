use thiserror::Error;

/// Failures surfaced by catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field is missing or malformed
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The request clashes with existing data, e.g. a taken username
    #[error("{0}")]
    Conflict(String),

    /// The external movie source exhausted its retries or returned nothing
    #[error("No movies fetched from external API")]
    UpstreamUnavailable,

    /// Storage failure. The detail is logged, never returned to clients.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn collection_not_found() -> Self {
        CatalogError::NotFound("Collection not found.".to_string())
    }

    pub fn movie_not_found() -> Self {
        CatalogError::NotFound("Movie not found.".to_string())
    }

    pub fn unknown_external_id(external_id: &str) -> Self {
        CatalogError::NotFound(format!(
            "Movie with external_id {} does not exist.",
            external_id
        ))
    }
}
