//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use reqwest::Client;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    config::AppConfig,
    domain::{
        catalog::{HttpCatalogClient, ProductCache},
        drafts::DraftOrder,
        orders::{HttpOrdersClient, OrderSubmitter, OrdersClient},
        partners::{HttpPartnersClient, PartnersClient},
        payments::{
            HostedCheckoutLauncher, PaymentGateway, ReadinessPolicy, WidgetPaymentGateway,
        },
    },
    erp::ErpClient,
    session::{SessionSource, StoredSession},
    storage::{FileStorage, KeyValueStorage},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Services shared by every command, wired from configuration.
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn KeyValueStorage>,
    pub sessions: Arc<dyn SessionSource>,
    pub catalog: Arc<ProductCache>,
    pub partners: Arc<dyn PartnersClient>,
    pub orders: Arc<dyn OrdersClient>,
    pub payments: Arc<dyn PaymentGateway>,
    pub currency: &'static Currency,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("catalog", &self.catalog)
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built or the configured currency is not
    /// an ISO 4217 code.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let currency = iso::find(&config.payments.currency.to_uppercase())
            .ok_or_else(|| AppInitError::UnknownCurrency(config.payments.currency.clone()))?;

        let erp = ErpClient::new(&config.api)?;

        let checkout_http = Client::builder()
            .timeout(config.payments.widget_timeout())
            .build()?;

        let storage: Arc<dyn KeyValueStorage> =
            Arc::new(FileStorage::new(config.storage.data_dir.clone()));

        let sessions: Arc<dyn SessionSource> = Arc::new(StoredSession::new(storage.clone()));

        let catalog = Arc::new(ProductCache::new(
            Arc::new(HttpCatalogClient::new(
                erp.clone(),
                config.catalog.product_limit,
            )),
            sessions.clone(),
            config.catalog.cache_ttl(),
        ));

        let payments = Arc::new(WidgetPaymentGateway::new(
            erp.clone(),
            Arc::new(HostedCheckoutLauncher::new(
                checkout_http,
                &config.payments.checkout_url,
            )),
            ReadinessPolicy {
                timeout: config.payments.widget_timeout(),
                interval: config.payments.widget_poll_interval(),
            },
        ));

        Ok(Self {
            storage,
            sessions,
            catalog,
            partners: Arc::new(HttpPartnersClient::new(erp.clone())),
            orders: Arc::new(HttpOrdersClient::new(erp)),
            payments,
            currency,
        })
    }

    /// The draft left by the previous run, or an empty one.
    pub fn restore_draft(&self) -> DraftOrder {
        DraftOrder::restore(self.storage.clone())
    }

    #[must_use]
    pub fn submitter(&self) -> OrderSubmitter {
        OrderSubmitter::new(
            self.orders.clone(),
            self.payments.clone(),
            self.catalog.clone(),
            self.sessions.clone(),
            self.currency,
        )
    }
}
