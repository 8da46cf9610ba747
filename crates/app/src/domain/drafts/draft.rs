//! Draft order.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::Timestamp;
use orderdesk::{
    cart::Cart,
    partners::Partner,
    products::{Product, ProductId},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
    domain::drafts::records::{CartRecord, DRAFT_CART_KEY, DRAFT_PARTNER_KEY, PartnerRecord},
    storage::KeyValueStorage,
};

/// The order being built: a cart plus the selected partner, mirrored to storage after every
/// change so an interrupted session can resume.
pub struct DraftOrder {
    storage: Arc<dyn KeyValueStorage>,
    cart: Cart,
    partner: Option<Partner>,
}

impl DraftOrder {
    /// Start an empty draft without touching storage.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            cart: Cart::new(),
            partner: None,
        }
    }

    /// Resume the draft left in storage. Missing or unreadable records start empty.
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let cart = read_record::<CartRecord>(storage.as_ref(), DRAFT_CART_KEY)
            .map(|record| record.lines)
            .unwrap_or_default();

        let partner = read_record::<PartnerRecord>(storage.as_ref(), DRAFT_PARTNER_KEY)
            .map(|record| record.partner);

        debug!(
            lines = cart.len(),
            partner = partner.as_ref().map(|p| p.id),
            "draft restored"
        );

        Self {
            storage,
            cart,
            partner,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn partner(&self) -> Option<&Partner> {
        self.partner.as_ref()
    }

    /// Add one unit of `product`. Returns the resulting quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        let quantity = self.cart.add(product);

        self.persist();

        quantity
    }

    /// Remove one unit of a product. Returns the remaining quantity.
    pub fn decrease(&mut self, product: &ProductId) -> u32 {
        let quantity = self.cart.decrease(product);

        self.persist();

        quantity
    }

    /// Set a product's quantity; zero or less removes it.
    pub fn change_quantity(&mut self, product: &ProductId, quantity: i64) -> u32 {
        let quantity = self.cart.change_quantity(product, quantity);

        self.persist();

        quantity
    }

    pub fn remove(&mut self, product: &ProductId) -> bool {
        let removed = self.cart.remove(product);

        self.persist();

        removed
    }

    pub fn select_partner(&mut self, partner: Partner) {
        self.partner = Some(partner);

        self.persist();
    }

    pub fn clear_partner(&mut self) {
        self.partner = None;

        self.persist();
    }

    /// Empty the cart, forget the partner and delete both stored records.
    pub fn clear_persistence(&mut self) {
        self.cart.clear();
        self.partner = None;

        for key in [DRAFT_CART_KEY, DRAFT_PARTNER_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!(key, %error, "failed to remove draft record");
            }
        }
    }

    /// Abandon the draft at the operator's request.
    pub fn discard(&mut self) {
        info!(lines = self.cart.len(), "discarding draft order");

        self.clear_persistence();
    }

    fn persist(&self) {
        let saved_at = Timestamp::now();

        write_record(
            self.storage.as_ref(),
            DRAFT_CART_KEY,
            &CartRecord {
                saved_at,
                lines: self.cart.clone(),
            },
        );

        match &self.partner {
            Some(partner) => write_record(
                self.storage.as_ref(),
                DRAFT_PARTNER_KEY,
                &PartnerRecord {
                    saved_at,
                    partner: partner.clone(),
                },
            ),
            None => {
                if let Err(error) = self.storage.remove(DRAFT_PARTNER_KEY) {
                    warn!(key = DRAFT_PARTNER_KEY, %error, "failed to remove draft record");
                }
            }
        }
    }
}

impl Debug for DraftOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DraftOrder")
            .field("cart", &self.cart)
            .field("partner", &self.partner)
            .finish_non_exhaustive()
    }
}

fn read_record<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(key, %error, "failed to read draft record");

            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(error) => {
            warn!(key, %error, "ignoring corrupt draft record");

            None
        }
    }
}

fn write_record<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, record: &T) {
    let raw = match serde_json::to_string(record) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(key, %error, "failed to serialise draft record");

            return;
        }
    };

    if let Err(error) = storage.set(key, &raw) {
        warn!(key, %error, "failed to save draft record");
    }
}
