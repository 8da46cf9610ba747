//! Payment errors.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("failed to reach the payment service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { message: String },

    #[error("missing payment parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("payment widget was not available after {waited:?}")]
    WidgetUnavailable { waited: Duration },

    #[error("invalid checkout url: {0}")]
    InvalidCheckoutUrl(String),
}
