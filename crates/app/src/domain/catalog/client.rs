//! Remote catalog client.

use async_trait::async_trait;
use mockall::automock;
use orderdesk::products::Product;
use tracing::debug;

use crate::{
    domain::catalog::{errors::CatalogClientError, payloads::parse_products},
    erp::{ErpClient, lenient_json, server_message},
    session::SessionContext,
};

/// Products requested per fetch unless configured otherwise.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    erp: ErpClient,
    limit: u32,
}

impl HttpCatalogClient {
    #[must_use]
    pub fn new(erp: ErpClient, limit: u32) -> Self {
        Self { erp, limit }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_products(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Product>, CatalogClientError> {
        let response = self
            .erp
            .http()
            .get(self.erp.url("products"))
            .query(&[
                ("employee_id", session.employee_id().to_string()),
                ("limit", self.limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_message(&lenient_json(&body))
                .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));

            return Err(CatalogClientError::Rejected { status, message });
        }

        let products = parse_products(&body)?;

        debug!(count = products.len(), "catalog fetched");

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the product list visible to the session's employee.
    async fn fetch_products(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Product>, CatalogClientError>;
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use crate::session::EmployeeId;

    use super::*;

    fn client(server: &MockServer) -> HttpCatalogClient {
        HttpCatalogClient::new(
            ErpClient::with_client(&server.uri(), Client::new()),
            DEFAULT_PRODUCT_LIMIT,
        )
    }

    fn session() -> SessionContext {
        SessionContext::new(EmployeeId::new(5))
    }

    #[tokio::test]
    async fn fetch_is_scoped_by_employee_and_limit() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("employee_id", "5"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Tornillo", "list_price": 1000, "qty_available": 12 },
                { "id": 2, "name": "Tuerca", "price": "$500", "qty_available": false },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let products = client(&server).fetch_products(&session()).await?;

        assert_eq!(products.len(), 2);
        assert_eq!(products.first().map(|p| p.qty_available), Some(12));
        assert_eq!(products.last().map(|p| p.qty_available), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn server_error_carries_detailed_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "message": "error", "detailedError": "Odoo down" })),
            )
            .mount(&server)
            .await;

        let result = client(&server).fetch_products(&session()).await;

        assert!(
            matches!(
                &result,
                Err(CatalogClientError::Rejected { status, message })
                    if *status == StatusCode::INTERNAL_SERVER_ERROR && message == "Odoo down"
            ),
            "expected rejection, got {result:?}"
        );
    }

    #[tokio::test]
    async fn server_error_without_body_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client(&server).fetch_products(&session()).await;

        assert_eq!(
            result.map_err(|error| error.to_string()).err().as_deref(),
            Some("HTTP error: 503")
        );
    }

    #[tokio::test]
    async fn object_body_is_an_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
            .mount(&server)
            .await;

        let result = client(&server).fetch_products(&session()).await;

        assert!(
            matches!(result, Err(CatalogClientError::InvalidResponse(_))),
            "expected invalid response, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_service_reports_the_cause() -> TestResult {
        let address = TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        let client = HttpCatalogClient::new(
            ErpClient::with_client(&format!("http://{address}"), Client::new()),
            DEFAULT_PRODUCT_LIMIT,
        );

        let error = client
            .fetch_products(&session())
            .await
            .err()
            .ok_or("expected a connection failure")?;

        let message = error.to_string();

        assert!(matches!(error, CatalogClientError::Http(_)), "{error:?}");
        assert!(
            message
                .strip_prefix("failed to reach the catalog service: ")
                .is_some_and(|cause| !cause.is_empty()),
            "cause missing from {message:?}"
        );

        Ok(())
    }
}
