//! Application configuration

use clap::Args;

pub mod api;
pub mod catalog;
pub mod observability;
pub mod payments;
pub mod storage;

pub use api::ApiConfig;
pub use catalog::CatalogConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use payments::PaymentConfig;
pub use storage::StorageConfig;

/// Orderdesk configuration, read from CLI arguments with environment fallbacks.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// ERP API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Product catalog cache settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Payment widget settings.
    #[command(flatten)]
    pub payments: PaymentConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
