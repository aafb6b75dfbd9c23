use thiserror::Error;

/// Outcomes of catalog actions that the caller must handle.
///
/// Upstream failures are not represented here: they degrade results instead of
/// failing requests (see `actions::paginate::UpstreamFault`).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Enrichment for a subject that has no live cached aggregation
    #[error("no aggregated collection for subject {subject}")]
    NoBaseCollection { subject: String },

    /// Request rejected before any work was done
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Internal fault; cache left unmodified
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        CatalogError::InvalidRequest {
            reason: reason.into(),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
