//! Payment models.

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{orders::OrderId, payments::errors::PaymentError};

/// Body of `POST /wompicol/widget-init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount_in_cents: i64,
    pub currency: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

/// Signed parameters needed to open the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutParams {
    pub currency: String,
    pub amount_in_cents: i64,
    pub reference: String,
    pub public_key: String,
    pub signature: String,
    pub redirect_url: Option<String>,
    pub customer_data: Option<Value>,
}

impl CheckoutParams {
    /// Read the parameters from a widget-init reply.
    ///
    /// They may sit under `widgetParams`, under `params` or at the top level, and each field
    /// may be spelled in snake or camel case.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingParameters`] naming every required field that is absent.
    pub fn from_reply(reply: &Value) -> Result<Self, PaymentError> {
        let params = ["widgetParams", "params"]
            .into_iter()
            .filter_map(|key| reply.get(key))
            .find(|value| value.is_object())
            .unwrap_or(reply);

        let currency = text(params, &["currency"]);
        let amount_in_cents =
            field(params, &["amount_in_cents", "amountInCents"]).and_then(parse_amount);
        let reference = text(params, &["reference"]);
        let public_key = text(params, &["public_key", "publicKey"]);
        let signature = field(params, &["signature"]).and_then(parse_signature);

        let mut missing = Vec::new();

        for (name, present) in [
            ("currency", currency.is_some()),
            ("amount_in_cents", amount_in_cents.is_some()),
            ("reference", reference.is_some()),
            ("public_key", public_key.is_some()),
            ("signature", signature.is_some()),
        ] {
            if !present {
                missing.push(name);
            }
        }

        let (
            Some(currency),
            Some(amount_in_cents),
            Some(reference),
            Some(public_key),
            Some(signature),
        ) = (currency, amount_in_cents, reference, public_key, signature)
        else {
            return Err(PaymentError::MissingParameters(missing));
        };

        Ok(Self {
            currency,
            amount_in_cents,
            reference,
            public_key,
            signature,
            redirect_url: text(params, &["redirect_url", "redirectUrl"]),
            customer_data: field(params, &["customerData", "customer_data"])
                .filter(|value| value.is_object())
                .cloned(),
        })
    }
}

/// Where the operator completes the payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLaunch {
    pub reference: String,
    pub checkout_url: Url,
}

/// First field present under any of `keys`. `null` and `false` count as absent.
fn field<'a>(params: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| params.get(key))
        .find(|value| !matches!(value, Value::Null | Value::Bool(false)))
}

fn text(params: &Value, keys: &[&str]) -> Option<String> {
    field(params, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn parse_amount(value: &Value) -> Option<i64> {
    let amount = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    amount.filter(|amount| *amount > 0)
}

/// The signature is either the integrity hash itself or an object carrying it.
fn parse_signature(value: &Value) -> Option<String> {
    let integrity = match value {
        Value::Object(_) => value.get("integrity")?,
        _ => value,
    };

    integrity
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn params_are_read_from_widget_params() -> TestResult {
        let reply = json!({
            "success": true,
            "widgetParams": {
                "currency": "COP",
                "amountInCents": 250_000,
                "reference": "S00042",
                "publicKey": "pub_test_123",
                "signature": { "integrity": "abc123" },
                "redirectUrl": "https://shop.example.com/done",
            },
        });

        let params = CheckoutParams::from_reply(&reply)?;

        assert_eq!(params.currency, "COP");
        assert_eq!(params.amount_in_cents, 250_000);
        assert_eq!(params.reference, "S00042");
        assert_eq!(params.public_key, "pub_test_123");
        assert_eq!(params.signature, "abc123");
        assert_eq!(params.redirect_url.as_deref(), Some("https://shop.example.com/done"));

        Ok(())
    }

    #[test]
    fn params_fall_back_to_root() -> TestResult {
        let reply = json!({
            "success": true,
            "currency": "COP",
            "amount_in_cents": "1500",
            "reference": "S00043",
            "public_key": "pub_test_123",
            "signature": "abc123",
            "redirect_url": false,
        });

        let params = CheckoutParams::from_reply(&reply)?;

        assert_eq!(params.amount_in_cents, 1500);
        assert_eq!(params.redirect_url, None);

        Ok(())
    }

    #[test]
    fn missing_parameters_are_all_named() {
        let reply = json!({ "params": { "currency": "COP", "amount_in_cents": 0 } });

        let result = CheckoutParams::from_reply(&reply);

        assert!(
            matches!(
                &result,
                Err(PaymentError::MissingParameters(missing))
                    if missing == &["amount_in_cents", "reference", "public_key", "signature"]
            ),
            "expected missing parameters, got {result:?}"
        );
    }

    #[test]
    fn request_omits_absent_employee() -> TestResult {
        let request = PaymentRequest {
            order_id: OrderId::Number(42),
            amount_in_cents: 250_000,
            currency: "COP".to_string(),
            employee_id: None,
        };

        assert_eq!(
            serde_json::to_value(&request)?,
            json!({ "order_id": 42, "amount_in_cents": 250_000, "currency": "COP" })
        );

        Ok(())
    }
}
