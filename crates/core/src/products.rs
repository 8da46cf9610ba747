//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing;

/// Product identifier as issued by the ERP.
///
/// Numeric and textual identifiers never compare equal, even when they render the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier
    Number(i64),

    /// Textual identifier
    Text(String),
}

impl ProductId {
    /// Interpret an identifier typed by an operator. Anything that parses as an integer is
    /// treated as a numeric identifier.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        input
            .parse::<i64>()
            .map_or_else(|_| Self::Text(input.to_string()), Self::Number)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Number(id) => Display::fmt(id, f),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Legacy price field. Older catalog entries carry a pre-formatted string such as `"$1,234.50"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PriceField {
    /// Plain numeric amount
    Amount(Decimal),

    /// Formatted amount, possibly with currency symbols and separators
    Text(String),
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Numeric list price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<Decimal>,

    /// Legacy price field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceField>,

    /// Stock on hand as of the last catalog fetch
    #[serde(default)]
    pub qty_available: u64,

    /// Internal reference (SKU)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_code: Option<String>,

    /// Base64 encoded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Short sales description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Create a product with no price and no stock.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            list_price: None,
            price: None,
            qty_available: 0,
            default_code: None,
            image: None,
            description: None,
        }
    }

    /// Set the numeric list price.
    #[must_use]
    pub fn with_list_price(mut self, list_price: Decimal) -> Self {
        self.list_price = Some(list_price);
        self
    }

    /// Set the legacy price field.
    #[must_use]
    pub fn with_price(mut self, price: PriceField) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the available stock.
    #[must_use]
    pub fn with_stock(mut self, qty_available: u64) -> Self {
        self.qty_available = qty_available;
        self
    }

    /// Resolved unit price, see [`pricing::unit_price`].
    pub fn unit_price(&self) -> Decimal {
        pricing::unit_price(self.list_price, self.price.as_ref())
    }

    /// Whether the catalog reported any stock for this product.
    pub fn in_stock(&self) -> bool {
        self.qty_available > 0
    }

    /// Case-insensitive match of `query` against the name and internal reference.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();

        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self
                .default_code
                .as_deref()
                .is_some_and(|code| code.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_prefers_numeric_ids() {
        assert_eq!(ProductId::parse("42"), ProductId::Number(42));
        assert_eq!(ProductId::parse(" 42 "), ProductId::Number(42));
        assert_eq!(
            ProductId::parse("SKU-42"),
            ProductId::Text("SKU-42".to_string())
        );
    }

    #[test]
    fn matches_name_or_code_ignoring_case() {
        let mut product = Product::new(1_i64, "Tornillo Hexagonal");
        product.default_code = Some("TOR-08".to_string());

        assert!(product.matches("hexa"));
        assert!(product.matches("tor-0"));
        assert!(product.matches("  "));
        assert!(!product.matches("tuerca"));
    }

    #[test]
    fn numeric_and_text_ids_are_distinct() {
        assert_ne!(ProductId::Number(5), ProductId::from("5"));
    }

    #[test]
    fn ids_deserialize_from_numbers_and_strings() -> TestResult {
        let ids: Vec<ProductId> = serde_json::from_str(r#"[7, "abc"]"#)?;

        assert_eq!(ids, vec![ProductId::Number(7), ProductId::from("abc")]);

        Ok(())
    }

    #[test]
    fn product_survives_json_round_trip() -> TestResult {
        let product = Product::new(1_i64, "Coffee")
            .with_list_price(Decimal::new(1250, 2))
            .with_price(PriceField::Text("$12.50".to_string()))
            .with_stock(3);

        let json = serde_json::to_string(&product)?;
        let restored: Product = serde_json::from_str(&json)?;

        assert_eq!(restored, product);
        assert_eq!(restored.list_price, Some(Decimal::new(1250, 2)));

        Ok(())
    }

    #[test]
    fn in_stock_reflects_quantity() {
        assert!(!Product::new(1_i64, "Tea").in_stock());
        assert!(Product::new(1_i64, "Tea").with_stock(1).in_stock());
    }
}
