//! Checkout widget.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Url};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::domain::payments::{
    errors::PaymentError,
    models::{CheckoutParams, PaymentLaunch},
};

/// How long to wait for the widget and how often to check on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            interval: Duration::from_millis(100),
        }
    }
}

/// Poll `launcher` until it reports ready.
///
/// # Errors
///
/// Returns [`PaymentError::WidgetUnavailable`] once `policy.timeout` has passed without the
/// widget becoming ready.
pub async fn wait_until_ready(
    launcher: &dyn WidgetLauncher,
    policy: ReadinessPolicy,
) -> Result<(), PaymentError> {
    let started = Instant::now();

    loop {
        if launcher.is_ready().await {
            debug!(waited = ?started.elapsed(), "payment widget ready");

            return Ok(());
        }

        let waited = started.elapsed();

        if waited >= policy.timeout {
            return Err(PaymentError::WidgetUnavailable { waited });
        }

        sleep(policy.interval.min(policy.timeout - waited)).await;
    }
}

/// Opens the checkout for a set of signed parameters.
#[automock]
#[async_trait]
pub trait WidgetLauncher: Send + Sync {
    /// Whether the widget can be opened right now.
    async fn is_ready(&self) -> bool;

    /// Open the checkout.
    async fn open(&self, params: &CheckoutParams) -> Result<PaymentLaunch, PaymentError>;
}

/// Hosted web checkout: ready when the checkout host serves its widget script, opened by
/// building the signed checkout link for the operator to follow.
#[derive(Debug, Clone)]
pub struct HostedCheckoutLauncher {
    http: Client,
    base_url: String,
}

impl HostedCheckoutLauncher {
    #[must_use]
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Signed checkout link for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidCheckoutUrl`] when the configured base URL is malformed.
    pub fn checkout_url(&self, params: &CheckoutParams) -> Result<Url, PaymentError> {
        let mut url = Url::parse(&format!("{}/p/", self.base_url))
            .map_err(|error| PaymentError::InvalidCheckoutUrl(error.to_string()))?;

        {
            let mut query = url.query_pairs_mut();

            query
                .append_pair("public-key", &params.public_key)
                .append_pair("currency", &params.currency)
                .append_pair("amount-in-cents", &params.amount_in_cents.to_string())
                .append_pair("reference", &params.reference)
                .append_pair("signature:integrity", &params.signature);

            if let Some(redirect_url) = &params.redirect_url {
                query.append_pair("redirect-url", redirect_url);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl WidgetLauncher for HostedCheckoutLauncher {
    async fn is_ready(&self) -> bool {
        let url = format!("{}/widget.js", self.base_url);

        match self.http.head(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%error, "checkout host not reachable yet");

                false
            }
        }
    }

    async fn open(&self, params: &CheckoutParams) -> Result<PaymentLaunch, PaymentError> {
        Ok(PaymentLaunch {
            reference: params.reference.clone(),
            checkout_url: self.checkout_url(params)?,
        })
    }
}
