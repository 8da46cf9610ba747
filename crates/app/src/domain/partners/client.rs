//! Remote partner search.

use async_trait::async_trait;
use mockall::automock;
use orderdesk::partners::Partner;
use tracing::debug;

use crate::{
    domain::partners::{errors::PartnersClientError, payloads::parse_partners},
    erp::{ErpClient, lenient_json, server_message},
    session::SessionContext,
};

/// Matches returned per search.
pub const PARTNER_SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct HttpPartnersClient {
    erp: ErpClient,
}

impl HttpPartnersClient {
    #[must_use]
    pub fn new(erp: ErpClient) -> Self {
        Self { erp }
    }
}

#[async_trait]
impl PartnersClient for HttpPartnersClient {
    async fn search_partners(
        &self,
        session: &SessionContext,
        query: &str,
    ) -> Result<Vec<Partner>, PartnersClientError> {
        let mut params = vec![
            ("employee_id", session.employee_id().to_string()),
            ("limit", PARTNER_SEARCH_LIMIT.to_string()),
        ];

        let query = query.trim();

        if !query.is_empty() {
            params.insert(0, ("search", query.to_string()));
        }

        let response = self
            .erp
            .http()
            .get(self.erp.url("partners"))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = server_message(&lenient_json(&body))
                .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));

            return Err(PartnersClientError::Rejected { status, message });
        }

        let partners = parse_partners(&body)?;

        debug!(query, count = partners.len(), "partners searched");

        Ok(partners)
    }
}

#[automock]
#[async_trait]
pub trait PartnersClient: Send + Sync {
    /// Search the customers visible to the session's employee by name, email, phone or
    /// document number. A blank query lists the first customers.
    async fn search_partners(
        &self,
        session: &SessionContext,
        query: &str,
    ) -> Result<Vec<Partner>, PartnersClientError>;
}
