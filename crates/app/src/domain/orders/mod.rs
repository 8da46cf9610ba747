//! Sale Orders

pub mod client;
pub mod errors;
pub mod models;
pub mod submission;

pub use client::{HttpOrdersClient, OrdersClient};
pub use errors::OrdersClientError;
pub use models::{
    CreatedOrder, NewSaleOrder, OrderId, OrderLine, OrderState, SaleOrderSummary,
};
pub use submission::{
    OrderSubmitter, PaymentOffer, SubmissionError, SubmissionOutcome, SubmissionState,
};
