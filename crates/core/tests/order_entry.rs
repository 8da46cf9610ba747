//! Cart behaviour as seen from an order entry session

use orderdesk::{
    cart::Cart,
    products::{PriceField, Product, ProductId},
};
use rust_decimal::Decimal;
use testresult::TestResult;

fn catalog() -> Vec<Product> {
    vec![
        Product::new(1_i64, "Tornillo")
            .with_list_price(Decimal::new(1000, 0))
            .with_stock(40),
        Product::new(2_i64, "Tuerca")
            .with_price(PriceField::Text("$ 1,250.50 c/u".to_string()))
            .with_stock(3),
        Product::new("SKU-3", "Arandela").with_price(PriceField::Amount(Decimal::new(75, 0))),
        Product::new(4_i64, "Muestra")
            .with_list_price(Decimal::ZERO)
            .with_price(PriceField::Text("n/a".to_string())),
    ]
}

#[test]
fn pricing_falls_back_in_order() {
    let prices: Vec<Decimal> = catalog().iter().map(Product::unit_price).collect();

    assert_eq!(
        prices,
        [
            Decimal::new(1000, 0),
            Decimal::new(125_050, 2),
            Decimal::new(75, 0),
            Decimal::ZERO,
        ]
    );
}

#[test]
fn building_an_order_from_the_catalog() -> TestResult {
    let products = catalog();
    let mut cart = Cart::new();

    for product in &products {
        cart.add(product);
    }

    let tornillo = ProductId::Number(1);
    let arandela = ProductId::from("SKU-3");

    cart.add(products.first().ok_or("empty catalog")?);
    cart.change_quantity(&arandela, 4);
    cart.change_quantity(&ProductId::Number(4), 0);
    cart.decrease(&ProductId::Number(2));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.quantity_of(&tornillo), 2);
    assert_eq!(cart.quantity_of(&arandela), 4);
    assert_eq!(cart.item_count(), 6);
    assert_eq!(cart.subtotal(), Decimal::new(2300, 0));

    assert_eq!(cart.amount_in_minor_units()?, 230_000);

    Ok(())
}

#[test]
fn draft_cart_survives_serialization() -> TestResult {
    let mut cart = Cart::new();

    for product in &catalog() {
        cart.add(product);
        cart.add(product);
    }

    let restored: Cart = serde_json::from_str(&serde_json::to_string(&cart)?)?;

    assert_eq!(restored, cart);

    Ok(())
}
