//! Cart

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    pricing::{PricingError, amount_in_minor_units},
    products::{Product, ProductId},
};

/// Errors raised when rebuilding a cart from stored lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Two lines refer to the same product.
    #[error("product {0} appears on more than one cart line")]
    DuplicateLine(ProductId),
}

/// A product snapshot with the quantity ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: NonZeroU32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The product as it was when first added to the cart.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity ordered; always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Unit price resolved from the snapshot.
    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price()
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity.get())
    }
}

/// Cart
///
/// Lines keep the order in which their products were first added. A line never holds a
/// quantity of zero: reducing it below one removes the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, appending a new line on first add.
    ///
    /// Returns the resulting quantity for the product.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);

            return line.quantity();
        }

        self.lines.push(CartLine::new(product.clone()));

        1
    }

    /// Remove one unit of the product, dropping the line when it reaches zero.
    ///
    /// Returns the remaining quantity, zero when the product is no longer in the cart.
    pub fn decrease(&mut self, product: &ProductId) -> u32 {
        let current = self.quantity_of(product);

        self.change_quantity(product, i64::from(current) - 1)
    }

    /// Set the quantity of a product already in the cart. A quantity of zero or less removes
    /// the line; unknown products are ignored.
    ///
    /// Returns the resulting quantity.
    pub fn change_quantity(&mut self, product: &ProductId, quantity: i64) -> u32 {
        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        let Some(quantity) = NonZeroU32::new(clamped) else {
            self.remove(product);

            return 0;
        };

        match self.line_mut(product) {
            Some(line) => {
                line.quantity = quantity;

                quantity.get()
            }
            None => 0,
        }
    }

    /// Drop the line for a product. Returns whether a line was removed.
    pub fn remove(&mut self, product: &ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| &line.product.id != product);

        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    pub fn line(&self, product: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product)
    }

    /// Quantity of a product in the cart, zero when absent.
    pub fn quantity_of(&self, product: &ProductId) -> u32 {
        self.line(product).map_or(0, CartLine::quantity)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal in minor currency units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] when the subtotal is too large to express in minor units.
    pub fn amount_in_minor_units(&self) -> Result<i64, PricingError> {
        amount_in_minor_units(self.subtotal())
    }

    fn line_mut(&mut self, product: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product.id == product)
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        for (index, line) in lines.iter().enumerate() {
            let duplicate = lines
                .iter()
                .skip(index + 1)
                .any(|other| other.product.id == line.product.id);

            if duplicate {
                return Err(CartError::DuplicateLine(line.product.id.clone()));
            }
        }

        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::PriceField;

    use super::*;

    fn product(id: i64, price: i64) -> Product {
        Product::new(id, format!("Product {id}")).with_list_price(Decimal::new(price, 0))
    }

    #[test]
    fn add_appends_new_line_with_quantity_one() {
        let mut cart = Cart::new();

        assert_eq!(cart.add(&product(1, 100)), 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::Number(1)), 1);
    }

    #[test]
    fn re_adding_increments_existing_line() {
        let mut cart = Cart::new();
        let coffee = product(1, 100);

        cart.add(&coffee);
        let quantity = cart.add(&coffee);

        assert_eq!(quantity, 2);
        assert_eq!(cart.len(), 1, "expected a single line");
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn increments_do_not_reorder_lines() {
        let mut cart = Cart::new();

        cart.add(&product(1, 100));
        cart.add(&product(2, 100));
        cart.add(&product(1, 100));

        let ids: Vec<&ProductId> = cart.lines().iter().map(|line| &line.product().id).collect();

        assert_eq!(ids, vec![&ProductId::Number(1), &ProductId::Number(2)]);
    }

    #[test]
    fn decreasing_below_one_removes_line() {
        let mut cart = Cart::new();
        let coffee = product(1, 100);

        cart.add(&coffee);

        assert_eq!(cart.decrease(&coffee.id), 0);
        assert_eq!(cart.decrease(&coffee.id), 0);
        assert!(cart.is_empty());
        assert!(cart.line(&coffee.id).is_none());
    }

    #[test]
    fn decrease_keeps_line_above_one() {
        let mut cart = Cart::new();
        let coffee = product(1, 100);

        cart.add(&coffee);
        cart.add(&coffee);

        assert_eq!(cart.decrease(&coffee.id), 1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn change_quantity_sets_value_or_removes() {
        let mut cart = Cart::new();
        let coffee = product(1, 100);

        cart.add(&coffee);

        assert_eq!(cart.change_quantity(&coffee.id, 5), 5);
        assert_eq!(cart.quantity_of(&coffee.id), 5);

        assert_eq!(cart.change_quantity(&coffee.id, -2), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn change_quantity_ignores_unknown_product() {
        let mut cart = Cart::new();

        cart.add(&product(1, 100));

        assert_eq!(cart.change_quantity(&ProductId::Number(2), 4), 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn remove_drops_line() {
        let mut cart = Cart::new();

        cart.add(&product(1, 100));
        cart.add(&product(2, 100));

        assert!(cart.remove(&ProductId::Number(1)));
        assert!(!cart.remove(&ProductId::Number(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn totals_use_resolved_unit_prices() -> TestResult {
        let mut cart = Cart::new();
        let legacy = Product::new("legacy", "Legacy")
            .with_list_price(Decimal::ZERO)
            .with_price(PriceField::Text("$1,234.50".to_string()));

        cart.add(&product(1, 1000));
        cart.add(&legacy);
        cart.add(&legacy);

        assert_eq!(cart.subtotal(), Decimal::new(346_900, 2));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.amount_in_minor_units()?, 346_900);

        Ok(())
    }

    #[test]
    fn line_keeps_snapshot_taken_at_add_time() {
        let mut cart = Cart::new();
        let mut coffee = product(1, 100);

        cart.add(&coffee);
        coffee.list_price = Some(Decimal::new(999, 0));
        cart.add(&coffee);

        assert_eq!(
            cart.line(&coffee.id).map(CartLine::unit_price),
            Some(Decimal::new(100, 0))
        );
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();

        cart.add(&product(1, 100));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn serde_rejects_zero_quantity() {
        let json = r#"[{"product":{"id":1,"name":"A"},"quantity":0}]"#;

        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn serde_rejects_duplicate_lines() {
        let json = r#"[
            {"product":{"id":1,"name":"A"},"quantity":1},
            {"product":{"id":1,"name":"A"},"quantity":2}
        ]"#;

        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn serde_round_trip_preserves_lines() -> TestResult {
        let mut cart = Cart::new();

        cart.add(&product(1, 100));
        cart.add(&product(2, 250));
        cart.add(&product(2, 250));

        let restored: Cart = serde_json::from_str(&serde_json::to_string(&cart)?)?;

        assert_eq!(restored, cart);

        Ok(())
    }
}
