//! Customer lookup

pub mod client;
pub mod errors;
mod payloads;

pub use client::{HttpPartnersClient, PARTNER_SEARCH_LIMIT, PartnersClient};
pub use errors::PartnersClientError;
