//! Order models.

use std::fmt::{Display, Formatter, Result as FmtResult};

use orderdesk::{cart::Cart, partners::Partner, products::ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::SessionContext;

/// Sale order identifier issued by the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl OrderId {
    /// Interpret an identifier typed by an operator.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        input
            .parse::<i64>()
            .map_or_else(|_| Self::Text(input.to_string()), Self::Number)
    }

    /// Read an identifier from a reply field. Odoo's `false`, `null` and blank strings are
    /// treated as missing.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.trim().to_string())),
            _ => None,
        }
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Number(id) => Display::fmt(id, f),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// One `sale.order.line` in the create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_uom_qty: u32,
    pub name: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub price_unit: Decimal,
}

/// Body of `POST /create-sale-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSaleOrder {
    pub partner_id: i64,
    pub order_line: Vec<OrderLine>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

impl NewSaleOrder {
    /// Build the request for a cart, one line per cart line with its resolved unit price.
    pub fn from_cart(partner: &Partner, cart: &Cart, session: Option<&SessionContext>) -> Self {
        let order_line = cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                product_id: line.product().id.clone(),
                product_uom_qty: line.quantity(),
                name: line.product().name.clone(),
                price_unit: line.unit_price(),
            })
            .collect();

        Self {
            partner_id: partner.id,
            order_line,
            employee_id: session.map(|session| session.employee_id().get()),
        }
    }
}

/// What the ERP reported for a created order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: Option<OrderId>,
    pub message: Option<String>,
}

/// Lifecycle state of a sale order as reported by the ERP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderState {
    /// Quotation
    Draft,
    /// Quotation sent to the customer
    Sent,
    /// Confirmed sale order
    Sale,
    /// Locked
    Done,
    /// Cancelled
    Cancel,
    /// A state this desk does not know about
    Other(String),
}

impl OrderState {
    fn from_code(code: &str) -> Self {
        match code {
            "draft" => Self::Draft,
            "sent" => Self::Sent,
            "sale" => Self::Sale,
            "done" => Self::Done,
            "cancel" => Self::Cancel,
            other => Self::Other(other.to_string()),
        }
    }

    /// Quotations can still be paid or cancelled from the desk.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Draft => "quotation",
            Self::Sent => "quotation sent",
            Self::Sale => "sale order",
            Self::Done => "locked",
            Self::Cancel => "cancelled",
            Self::Other(code) => code.as_str(),
        })
    }
}

/// One row of the employee's order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleOrderSummary {
    /// Numeric record id, when the ERP sends one
    pub id: Option<OrderId>,
    /// Order reference, e.g. `S00042`
    pub name: String,
    /// Customer display name
    pub partner_name: Option<String>,
    /// Order date as sent by the ERP
    pub date_order: Option<String>,
    pub state: OrderState,
    pub amount_total: Decimal,
    /// Employee commission on the order, if the ERP computes one
    pub commission: Option<Decimal>,
}

impl SaleOrderSummary {
    /// The identifier to pay or cancel this order with.
    pub fn order_id(&self) -> OrderId {
        self.id
            .clone()
            .unwrap_or_else(|| OrderId::Text(self.name.clone()))
    }

    /// Read an entry of the `orders` list. Odoo sends `partner_id` as `[id, name]` or `false`.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let id = value.get("id").and_then(OrderId::from_value);
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| id.as_ref().map(ToString::to_string))?;

        let partner_name = value
            .get("partner_id")
            .and_then(Value::as_array)
            .and_then(|pair| pair.get(1))
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            id,
            name,
            partner_name,
            date_order: value
                .get("date_order")
                .and_then(Value::as_str)
                .map(str::to_string),
            state: OrderState::from_code(
                value.get("state").and_then(Value::as_str).unwrap_or("draft"),
            ),
            amount_total: value
                .get("amount_total")
                .and_then(decimal)
                .unwrap_or_default(),
            commission: value.get("x_commission_amount_sale").and_then(decimal),
        })
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.to_string().parse().ok()),
        _ => None,
    }
}
