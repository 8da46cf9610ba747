//! Catalog errors.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("failed to reach the catalog service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("invalid catalog response")]
    InvalidResponse(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Every caller joined to the failed fetch receives the same error.
    #[error("failed to load products: {0}")]
    Fetch(#[source] Arc<CatalogClientError>),
}
