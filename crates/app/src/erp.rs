//! HTTP plumbing shared by the ERP clients.

use reqwest::Client;
use serde_json::Value;

use crate::config::ApiConfig;

/// Base URL plus a pooled HTTP client for the ERP API.
#[derive(Debug, Clone)]
pub struct ErpClient {
    base_url: String,
    http: Client,
}

impl ErpClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(&config.api_url, http))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Human-readable message the server attached to a response body, if any.
///
/// Prefers `detailedError`, then `message`, then `error`. Blank strings and Odoo's `false`
/// placeholders are skipped.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    ["detailedError", "message", "error"]
        .into_iter()
        .filter_map(|key| body.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Parse a body as JSON, returning `Value::Null` for anything unparseable.
#[must_use]
pub fn lenient_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or(Value::Null)
}

/// A trimmed, non-empty string field. Odoo's `false` and `null` read as absent.
pub(crate) fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
