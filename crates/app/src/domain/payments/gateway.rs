//! Payment gateway.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::info;

use crate::{
    domain::payments::{
        errors::PaymentError,
        models::{CheckoutParams, PaymentLaunch, PaymentRequest},
        widget::{ReadinessPolicy, WidgetLauncher, wait_until_ready},
    },
    erp::{ErpClient, lenient_json, server_message},
};

/// Asks the ERP to sign a checkout for an order, then opens the widget with it.
pub struct WidgetPaymentGateway {
    erp: ErpClient,
    launcher: Arc<dyn WidgetLauncher>,
    readiness: ReadinessPolicy,
}

impl WidgetPaymentGateway {
    #[must_use]
    pub fn new(
        erp: ErpClient,
        launcher: Arc<dyn WidgetLauncher>,
        readiness: ReadinessPolicy,
    ) -> Self {
        Self {
            erp,
            launcher,
            readiness,
        }
    }

    async fn init_widget(&self, request: &PaymentRequest) -> Result<CheckoutParams, PaymentError> {
        let response = self
            .erp
            .http()
            .post(self.erp.url("wompicol/widget-init"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let reply = lenient_json(&response.text().await?);

        if !status.is_success() || reply.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(PaymentError::Rejected {
                message: server_message(&reply)
                    .unwrap_or_else(|| "failed to initialise payment".to_string()),
            });
        }

        CheckoutParams::from_reply(&reply)
    }
}

impl Debug for WidgetPaymentGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WidgetPaymentGateway")
            .field("erp", &self.erp)
            .field("readiness", &self.readiness)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentGateway for WidgetPaymentGateway {
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentLaunch, PaymentError> {
        let params = self.init_widget(request).await?;

        wait_until_ready(self.launcher.as_ref(), self.readiness).await?;

        let launch = self.launcher.open(&params).await?;

        info!(
            order_id = %request.order_id,
            reference = %launch.reference,
            "payment checkout opened"
        );

        Ok(launch)
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start collecting payment for an order.
    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentLaunch, PaymentError>;
}
