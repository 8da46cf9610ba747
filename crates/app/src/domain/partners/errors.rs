//! Partner client errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PartnersClientError {
    #[error("failed to reach the partner service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("invalid partner response")]
    InvalidResponse(#[source] serde_json::Error),
}
