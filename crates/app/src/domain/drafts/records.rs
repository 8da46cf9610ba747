//! Stored draft records.

use jiff::Timestamp;
use orderdesk::{cart::Cart, partners::Partner};
use serde::{Deserialize, Serialize};

/// Storage key for the draft cart.
pub const DRAFT_CART_KEY: &str = "orderdesk.draft.cart";

/// Storage key for the draft partner.
pub const DRAFT_PARTNER_KEY: &str = "orderdesk.draft.partner";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CartRecord {
    pub(crate) saved_at: Timestamp,
    pub(crate) lines: Cart,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PartnerRecord {
    pub(crate) saved_at: Timestamp,
    pub(crate) partner: Partner,
}
