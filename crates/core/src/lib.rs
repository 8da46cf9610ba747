//! Orderdesk
//!
//! Domain types for sales-order entry: catalog products, the unit pricing rule, and the cart
//! an operator builds before submitting a sale order.

pub mod cart;
pub mod partners;
pub mod pricing;
pub mod products;
