//! Orderdesk Domain Concerns

pub mod catalog;
pub mod drafts;
pub mod orders;
pub mod partners;
pub mod payments;
