//! Draft orders

mod draft;
pub mod records;

pub use draft::DraftOrder;
pub use records::{DRAFT_CART_KEY, DRAFT_PARTNER_KEY};
