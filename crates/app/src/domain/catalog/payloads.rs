//! ERP product payloads.
//!
//! Odoo serialises absent fields as `false`, so every optional field is read as a raw JSON
//! value and normalised here before it reaches the core model.

use std::str::FromStr;

use orderdesk::products::{PriceField, Product, ProductId};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::erp::text;

use super::errors::CatalogClientError;

#[derive(Debug, Deserialize)]
pub(crate) struct ProductPayload {
    id: ProductId,

    #[serde(default)]
    name: Value,

    #[serde(default)]
    list_price: Value,

    #[serde(default)]
    price: Value,

    #[serde(default)]
    qty_available: Value,

    #[serde(default)]
    default_code: Value,

    #[serde(default)]
    code: Value,

    #[serde(default)]
    image_512: Value,

    #[serde(default)]
    image: Value,

    #[serde(default)]
    description_sale: Value,
}

impl From<ProductPayload> for Product {
    fn from(payload: ProductPayload) -> Self {
        let name = text(&payload.name).unwrap_or_else(|| format!("Product {}", payload.id));

        Self {
            name,
            list_price: decimal(&payload.list_price),
            price: price_field(&payload.price),
            qty_available: stock(&payload.qty_available),
            default_code: text(&payload.default_code).or_else(|| text(&payload.code)),
            image: text(&payload.image_512).or_else(|| text(&payload.image)),
            description: text(&payload.description_sale),
            id: payload.id,
        }
    }
}

/// Parse a `/products` response body.
pub(crate) fn parse_products(body: &str) -> Result<Vec<Product>, CatalogClientError> {
    let payloads: Vec<ProductPayload> =
        serde_json::from_str(body).map_err(CatalogClientError::InvalidResponse)?;

    Ok(payloads.into_iter().map(Product::from).collect())
}

fn number(number: &Number) -> Option<Decimal> {
    if let Some(integer) = number.as_i64() {
        return Some(Decimal::from(integer));
    }

    let rendered = number.to_string();

    Decimal::from_str(&rendered)
        .or_else(|_| Decimal::from_scientific(&rendered))
        .ok()
        .or_else(|| number.as_f64().and_then(Decimal::from_f64))
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => number(n),
        _ => None,
    }
}

fn price_field(value: &Value) -> Option<PriceField> {
    match value {
        Value::Number(n) => number(n).map(PriceField::Amount),
        Value::String(s) if !s.trim().is_empty() => Some(PriceField::Text(s.clone())),
        _ => None,
    }
}

fn stock(value: &Value) -> u64 {
    decimal(value)
        .and_then(|quantity| quantity.floor().to_u64())
        .unwrap_or(0)
}
