//! Payments

pub mod errors;
pub mod gateway;
pub mod models;
pub mod widget;

pub use errors::PaymentError;
pub use gateway::{PaymentGateway, WidgetPaymentGateway};
pub use models::{CheckoutParams, PaymentLaunch, PaymentRequest};
pub use widget::{HostedCheckoutLauncher, ReadinessPolicy, WidgetLauncher};
