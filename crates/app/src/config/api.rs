//! ERP API Config

use std::time::Duration;

use clap::Args;

/// Connection settings for the ERP API.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the ERP API
    #[arg(long, env = "ORDERDESK_API_URL")]
    pub api_url: String,

    /// Timeout applied to every ERP request, in seconds
    #[arg(long, env = "ORDERDESK_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
