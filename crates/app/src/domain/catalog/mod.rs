//! Product catalog

pub mod cache;
pub mod client;
pub mod errors;
mod payloads;

pub use cache::{DEFAULT_TTL, ProductCache};
pub use client::{CatalogClient, DEFAULT_PRODUCT_LIMIT, HttpCatalogClient};
pub use errors::{CacheError, CatalogClientError};
