//! Terminal views

use std::io;

use jiff::Timestamp;
use orderdesk::{cart::Cart, partners::Partner, products::Product};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::domain::orders::SaleOrderSummary;

fn money(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}

/// Write the product list, showing how many of each product are already in `cart`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_products<'a>(
    out: &mut impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
    cart: &Cart,
    currency: &'static Currency,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Code", "Name", "Price", "Stock", "In cart"]);

    let mut rows = 0_usize;

    for product in products {
        let in_cart = cart.quantity_of(&product.id);

        builder.push_record([
            product.id.to_string(),
            product.default_code.clone().unwrap_or_default(),
            product.name.clone(),
            money(product.unit_price(), currency),
            product.qty_available.to_string(),
            if in_cart > 0 {
                in_cart.to_string()
            } else {
                String::new()
            },
        ]);

        rows += 1;
    }

    if rows == 0 {
        return writeln!(out, "no products found");
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")
}

/// Write the cart lines, the selected customer and the subtotal.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_cart(
    out: &mut impl io::Write,
    cart: &Cart,
    partner: Option<&Partner>,
    currency: &'static Currency,
) -> io::Result<()> {
    match partner {
        Some(partner) => writeln!(out, "customer: {} ({})", partner.name, partner.id)?,
        None => writeln!(out, "customer: none selected")?,
    }

    if cart.is_empty() {
        return writeln!(out, "cart is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Qty", "Unit price", "Total"]);

    for line in cart.lines() {
        builder.push_record([
            line.product().id.to_string(),
            line.product().name.clone(),
            line.quantity().to_string(),
            money(line.unit_price(), currency),
            money(line.line_total(), currency),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "items: {}", cart.item_count())?;
    writeln!(out, "subtotal: {}", money(cart.subtotal(), currency))
}

/// Write partner search results, numbered from 1 for `--pick`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_partners(out: &mut impl io::Write, partners: &[Partner]) -> io::Result<()> {
    if partners.is_empty() {
        return writeln!(out, "no customers found");
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "ID", "Name", "Email", "Phone", "Document"]);

    for (position, partner) in partners.iter().enumerate() {
        builder.push_record([
            (position + 1).to_string(),
            partner.id.to_string(),
            partner.name.clone(),
            partner.email.clone().unwrap_or_default(),
            partner.phone.clone().unwrap_or_default(),
            partner.vat.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    writeln!(out, "{table}")
}

/// Write the order history.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_orders(
    out: &mut impl io::Write,
    orders: &[SaleOrderSummary],
    currency: &'static Currency,
) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "no orders found");
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Date", "Customer", "State", "Total"]);

    for order in orders {
        builder.push_record([
            order.name.clone(),
            order.date_order.clone().unwrap_or_default(),
            order.partner_name.clone().unwrap_or_default(),
            order.state.to_string(),
            money(order.amount_total, currency),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..5), Alignment::right());

    writeln!(out, "{table}")
}

/// Describe how long ago the catalog was loaded.
pub fn catalog_age(last_updated: Option<Timestamp>, now: Timestamp) -> String {
    let Some(last_updated) = last_updated else {
        return "catalog not loaded".to_string();
    };

    let seconds = now.as_second().saturating_sub(last_updated.as_second()).max(0);

    match seconds {
        0..60 => format!("catalog updated {seconds}s ago"),
        60..3600 => format!("catalog updated {}m ago", seconds / 60),
        _ => format!("catalog updated {}h ago", seconds / 3600),
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::domain::orders::OrderState;

    use super::*;

    fn render<F>(write: F) -> TestResult<String>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();

        write(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn product_list_shows_cart_quantities() -> TestResult {
        let tornillo = Product::new(1_i64, "Tornillo")
            .with_list_price(Decimal::new(1000, 0))
            .with_stock(12);
        let tuerca = Product::new(2_i64, "Tuerca").with_list_price(Decimal::new(500, 0));

        let mut cart = Cart::new();
        cart.add(&tornillo);
        cart.add(&tornillo);

        let products = vec![tornillo, tuerca];

        let output = render(|out| write_products(out, &products, &cart, iso::COP))?;

        let row: Vec<&str> = output
            .lines()
            .find(|line| line.contains("Tornillo"))
            .ok_or("missing product row")?
            .split('│')
            .map(str::trim)
            .collect();

        assert_eq!(row.get(5), Some(&"12"), "stock column: {row:?}");
        assert_eq!(row.get(6), Some(&"2"), "in cart column: {row:?}");
        assert!(output.contains("Tuerca"), "missing second product: {output}");

        Ok(())
    }

    #[test]
    fn empty_product_list_says_so() -> TestResult {
        let products: Vec<Product> = Vec::new();

        let output = render(|out| write_products(out, &products, &Cart::new(), iso::COP))?;

        assert_eq!(output.trim(), "no products found");

        Ok(())
    }

    #[test]
    fn cart_view_names_customer_and_counts_items() -> TestResult {
        let mut cart = Cart::new();
        let product = Product::new(1_i64, "Tornillo").with_list_price(Decimal::new(1000, 0));
        cart.add(&product);
        cart.add(&product);

        let partner = Partner::new(3, "Ferretería Central");

        let output = render(|out| write_cart(out, &cart, Some(&partner), iso::COP))?;

        assert!(output.starts_with("customer: Ferretería Central (3)"));
        assert!(output.contains("Tornillo"));
        assert!(output.contains("items: 2"));

        Ok(())
    }

    #[test]
    fn empty_cart_view() -> TestResult {
        let output = render(|out| write_cart(out, &Cart::new(), None, iso::COP))?;

        assert_eq!(output, "customer: none selected\ncart is empty\n");

        Ok(())
    }

    #[test]
    fn partner_results_are_numbered_for_picking() -> TestResult {
        let partners = vec![
            Partner::new(3, "Ferretería Central"),
            Partner {
                email: Some("ventas@ferremax.co".to_string()),
                ..Partner::new(4, "Ferremax")
            },
        ];

        let output = render(|out| write_partners(out, &partners))?;

        let row: Vec<&str> = output
            .lines()
            .find(|line| line.contains("Ferremax"))
            .ok_or("missing partner row")?
            .split('│')
            .map(str::trim)
            .collect();

        assert_eq!(row.get(1), Some(&"2"), "position column: {row:?}");
        assert_eq!(row.get(2), Some(&"4"), "id column: {row:?}");
        assert_eq!(row.get(4), Some(&"ventas@ferremax.co"), "email column: {row:?}");

        assert_eq!(render(|out| write_partners(out, &[]))?.trim(), "no customers found");

        Ok(())
    }

    #[test]
    fn order_history_shows_state_and_customer() -> TestResult {
        let orders = vec![SaleOrderSummary {
            id: Some(42_i64.into()),
            name: "S00042".to_string(),
            partner_name: Some("Ferretería Central".to_string()),
            date_order: Some("2026-03-01 10:15:00".to_string()),
            state: OrderState::Sent,
            amount_total: Decimal::new(250_000, 0),
            commission: None,
        }];

        let output = render(|out| write_orders(out, &orders, iso::COP))?;

        let row: Vec<&str> = output
            .lines()
            .find(|line| line.contains("S00042"))
            .ok_or("missing order row")?
            .split('│')
            .map(str::trim)
            .collect();

        assert_eq!(row.get(3), Some(&"Ferretería Central"), "customer column: {row:?}");
        assert_eq!(row.get(4), Some(&"quotation sent"), "state column: {row:?}");

        assert_eq!(render(|out| write_orders(out, &[], iso::COP))?.trim(), "no orders found");

        Ok(())
    }

    #[test]
    fn catalog_age_buckets() -> TestResult {
        let now: Timestamp = "2026-03-01T12:00:00Z".parse()?;

        assert_eq!(catalog_age(None, now), "catalog not loaded");
        assert_eq!(
            catalog_age(Some("2026-03-01T11:59:30Z".parse()?), now),
            "catalog updated 30s ago"
        );
        assert_eq!(
            catalog_age(Some("2026-03-01T11:45:00Z".parse()?), now),
            "catalog updated 15m ago"
        );
        assert_eq!(
            catalog_age(Some("2026-03-01T09:00:00Z".parse()?), now),
            "catalog updated 3h ago"
        );

        Ok(())
    }
}
