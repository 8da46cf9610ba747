//! Payments Config

use std::time::Duration;

use clap::Args;

/// Payment widget settings.
#[derive(Debug, Clone, Args)]
pub struct PaymentConfig {
    /// ISO 4217 currency orders are charged in
    #[arg(long, env = "ORDERDESK_CURRENCY", default_value = "COP")]
    pub currency: String,

    /// Base URL of the hosted checkout
    #[arg(
        long,
        env = "ORDERDESK_CHECKOUT_URL",
        default_value = "https://checkout.wompi.co"
    )]
    pub checkout_url: String,

    /// How long to wait for the payment widget to become available, in milliseconds
    #[arg(long, env = "ORDERDESK_WIDGET_TIMEOUT_MS", default_value_t = 8_000)]
    pub widget_timeout_ms: u64,

    /// Delay between widget availability checks, in milliseconds
    #[arg(long, env = "ORDERDESK_WIDGET_POLL_INTERVAL_MS", default_value_t = 100)]
    pub widget_poll_interval_ms: u64,
}

impl PaymentConfig {
    #[must_use]
    pub fn widget_timeout(&self) -> Duration {
        Duration::from_millis(self.widget_timeout_ms)
    }

    #[must_use]
    pub fn widget_poll_interval(&self) -> Duration {
        Duration::from_millis(self.widget_poll_interval_ms)
    }
}
