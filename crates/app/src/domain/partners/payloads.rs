//! ERP partner payloads.

use orderdesk::partners::Partner;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::erp::text;

use super::errors::PartnersClientError;

#[derive(Debug, Deserialize)]
struct PartnerPayload {
    id: i64,

    #[serde(default)]
    name: Value,

    #[serde(default)]
    email: Value,

    #[serde(default)]
    phone: Value,

    #[serde(default)]
    vat: Value,
}

impl From<PartnerPayload> for Partner {
    fn from(payload: PartnerPayload) -> Self {
        Self {
            name: text(&payload.name).unwrap_or_else(|| format!("Partner {}", payload.id)),
            email: text(&payload.email),
            phone: text(&payload.phone),
            vat: text(&payload.vat),
            id: payload.id,
        }
    }
}

/// Parse a `/partners` response body.
///
/// Anything other than a JSON array means no matches. Entries without a numeric id are
/// skipped.
pub(crate) fn parse_partners(body: &str) -> Result<Vec<Partner>, PartnersClientError> {
    let value: Value = serde_json::from_str(body).map_err(PartnersClientError::InvalidResponse)?;

    let Value::Array(entries) = value else {
        debug!("partner search returned a non-list body");

        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<PartnerPayload>(entry).ok())
        .map(Partner::from)
        .collect())
}
