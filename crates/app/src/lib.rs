//! Sales order entry: catalog cache, draft orders, order submission and payment.

pub mod config;
pub mod context;
pub mod domain;
pub mod erp;
pub mod observability;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test;
