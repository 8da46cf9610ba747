//! Catalog Config

use std::time::Duration;

use clap::Args;

/// Product catalog cache settings.
#[derive(Debug, Clone, Args)]
pub struct CatalogConfig {
    /// Maximum age of the cached product list before it is fetched again, in seconds
    #[arg(long, env = "ORDERDESK_CACHE_TTL_SECS", default_value_t = 900)]
    pub cache_ttl_secs: u64,

    /// Maximum number of products requested from the ERP
    #[arg(long, env = "ORDERDESK_PRODUCT_LIMIT", default_value_t = 100)]
    pub product_limit: u32,
}

impl CatalogConfig {
    /// Cache time-to-live as a duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
