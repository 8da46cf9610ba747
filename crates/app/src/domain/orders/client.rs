//! Remote order client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    domain::orders::{
        errors::OrdersClientError,
        models::{CreatedOrder, NewSaleOrder, OrderId, SaleOrderSummary},
    },
    erp::{ErpClient, lenient_json, server_message},
    session::SessionContext,
};

#[derive(Debug, Deserialize)]
struct CreateOrderReply {
    #[serde(default)]
    order_id: Value,

    #[serde(default)]
    message: Value,
}

#[derive(Debug, Clone)]
pub struct HttpOrdersClient {
    erp: ErpClient,
}

impl HttpOrdersClient {
    #[must_use]
    pub fn new(erp: ErpClient) -> Self {
        Self { erp }
    }
}

#[async_trait]
impl OrdersClient for HttpOrdersClient {
    async fn create_order(&self, order: &NewSaleOrder) -> Result<CreatedOrder, OrdersClientError> {
        let response = self
            .erp
            .http()
            .post(self.erp.url("create-sale-order"))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let created = parse_create_reply(status, &body)?;

        info!(
            order_id = created.order_id.as_ref().map(ToString::to_string),
            lines = order.order_line.len(),
            "sale order created"
        );

        Ok(created)
    }

    async fn cancel_order(&self, order: &OrderId) -> Result<(), OrdersClientError> {
        let response = self
            .erp
            .http()
            .post(self.erp.url("cancel-sale-order"))
            .json(&json!({ "order_id": order }))
            .send()
            .await?;

        let status = response.status();
        let body = lenient_json(&response.text().await?);

        if status.is_success() && body.get("ok").and_then(Value::as_bool) == Some(true) {
            info!(%order, "sale order cancelled");

            return Ok(());
        }

        Err(OrdersClientError::Rejected {
            message: server_message(&body)
                .unwrap_or_else(|| format!("failed to cancel order {order}")),
        })
    }

    async fn list_orders(
        &self,
        session: &SessionContext,
        limit: u32,
    ) -> Result<Vec<SaleOrderSummary>, OrdersClientError> {
        let response = self
            .erp
            .http()
            .get(self.erp.url("sale_orders"))
            .query(&[
                ("employee_id", session.employee_id().to_string()),
                ("limit", limit.to_string()),
                ("order", "date_order desc".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let orders = parse_list_reply(status, &body)?;

        debug!(count = orders.len(), "sale orders listed");

        Ok(orders)
    }
}

/// Interpret a `/sale_orders` reply: `{"success": true, "orders": [...]}`.
fn parse_list_reply(
    status: StatusCode,
    body: &str,
) -> Result<Vec<SaleOrderSummary>, OrdersClientError> {
    if !status.is_success() {
        return Err(OrdersClientError::Rejected {
            message: server_message(&lenient_json(body))
                .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16())),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(OrdersClientError::InvalidResponse)?;

    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(OrdersClientError::Rejected {
            message: server_message(&value).unwrap_or_else(|| "failed to load orders".to_string()),
        });
    }

    Ok(value
        .get("orders")
        .and_then(Value::as_array)
        .map(|orders| {
            orders
                .iter()
                .filter_map(SaleOrderSummary::from_value)
                .collect()
        })
        .unwrap_or_default())
}

/// Interpret a `/create-sale-order` reply. A non-2xx status or `success: false` is a
/// rejection; a 2xx body that is not a JSON object is an invalid response.
fn parse_create_reply(status: StatusCode, body: &str) -> Result<CreatedOrder, OrdersClientError> {
    if !status.is_success() {
        return Err(OrdersClientError::Rejected {
            message: server_message(&lenient_json(body)).unwrap_or_else(|| {
                format!("failed to create order (HTTP {})", status.as_u16())
            }),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(OrdersClientError::InvalidResponse)?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(OrdersClientError::Rejected {
            message: server_message(&value).unwrap_or_else(|| "failed to create order".to_string()),
        });
    }

    let reply: CreateOrderReply =
        serde_json::from_value(value).map_err(OrdersClientError::InvalidResponse)?;

    Ok(CreatedOrder {
        order_id: OrderId::from_value(&reply.order_id),
        message: reply.message.as_str().map(str::to_string),
    })
}

#[automock]
#[async_trait]
pub trait OrdersClient: Send + Sync {
    /// Create a sale order.
    async fn create_order(&self, order: &NewSaleOrder) -> Result<CreatedOrder, OrdersClientError>;

    /// Cancel a sale order that has not been paid.
    async fn cancel_order(&self, order: &OrderId) -> Result<(), OrdersClientError>;

    /// The session employee's most recent sale orders, newest first.
    async fn list_orders(
        &self,
        session: &SessionContext,
        limit: u32,
    ) -> Result<Vec<SaleOrderSummary>, OrdersClientError>;
}
