//! Order client errors.

use thiserror::Error;

/// The `Display` of each variant is the message shown to the operator.
#[derive(Debug, Error)]
pub enum OrdersClientError {
    #[error("failed to reach the order service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from the order service")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("{message}")]
    Rejected { message: String },
}
