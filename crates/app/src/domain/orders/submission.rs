//! Order submission.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use orderdesk::pricing::{PricingError, money_from_minor};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        catalog::ProductCache,
        drafts::DraftOrder,
        orders::{
            client::OrdersClient,
            errors::OrdersClientError,
            models::{NewSaleOrder, OrderId},
        },
        payments::{PaymentError, PaymentGateway, PaymentLaunch, PaymentRequest},
    },
    session::SessionSource,
};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("select a customer before submitting the order")]
    PartnerRequired,

    #[error("add at least one product before submitting the order")]
    EmptyCart,

    #[error("payment amount must be greater than zero")]
    NonPositiveAmount,

    #[error(transparent)]
    Amount(#[from] PricingError),

    #[error(transparent)]
    Order(#[from] OrdersClientError),

    #[error("no order is waiting for payment")]
    NoPaymentPending,

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// An order that can be paid right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOffer {
    pub order_id: OrderId,
    pub amount_in_minor_units: i64,
    pub currency: &'static Currency,
}

impl PaymentOffer {
    #[must_use]
    pub fn amount(&self) -> Money<'static, Currency> {
        money_from_minor(self.amount_in_minor_units, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Order created with nothing to collect, or without an id to collect against.
    Completed {
        order_id: Option<OrderId>,
        notice: String,
    },

    /// Order created and payable now or later.
    PaymentOffered(PaymentOffer),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded(SubmissionOutcome),
    Failed(String),
    AwaitingPayment(PaymentOffer),
}

/// Drives a draft through order creation and, optionally, payment.
pub struct OrderSubmitter {
    orders: Arc<dyn OrdersClient>,
    payments: Arc<dyn PaymentGateway>,
    catalog: Arc<ProductCache>,
    sessions: Arc<dyn SessionSource>,
    currency: &'static Currency,
    state: SubmissionState,
}

impl OrderSubmitter {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersClient>,
        payments: Arc<dyn PaymentGateway>,
        catalog: Arc<ProductCache>,
        sessions: Arc<dyn SessionSource>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            orders,
            payments,
            catalog,
            sessions,
            currency,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Create a sale order from the draft.
    ///
    /// On success the draft is cleared and the product cache is refreshed once. On failure
    /// the draft is left untouched so the operator can retry.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::PartnerRequired`] or [`SubmissionError::EmptyCart`], checked
    /// in that order, before any request is made; or the order client's error when the ERP
    /// rejects the order.
    pub async fn submit(
        &mut self,
        draft: &mut DraftOrder,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.state = SubmissionState::Validating;

        let (request, amount) = match self.prepare(draft) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.state = SubmissionState::Idle;

                return Err(error);
            }
        };

        self.state = SubmissionState::Submitting;

        info!(
            partner_id = request.partner_id,
            lines = request.order_line.len(),
            amount_in_minor_units = amount,
            "submitting sale order"
        );

        let created = match self.orders.create_order(&request).await {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, "sale order was not created");

                self.state = SubmissionState::Failed(error.to_string());

                return Err(error.into());
            }
        };

        draft.clear_persistence();

        if let Err(error) = self.catalog.refresh().await {
            warn!(%error, "failed to refresh products after order");
        }

        let outcome = match created.order_id {
            Some(order_id) if amount > 0 => SubmissionOutcome::PaymentOffered(PaymentOffer {
                order_id,
                amount_in_minor_units: amount,
                currency: self.currency,
            }),
            order_id => SubmissionOutcome::Completed {
                notice: created.message.unwrap_or_else(|| match &order_id {
                    Some(id) => format!("order {id} created"),
                    None => "order created".to_string(),
                }),
                order_id,
            },
        };

        self.state = SubmissionState::Succeeded(outcome.clone());

        Ok(outcome)
    }

    /// Collect payment for the order just created.
    ///
    /// The product cache is refreshed afterwards whether or not the payment went through.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NoPaymentPending`] unless the last submission offered a
    /// payment, or the gateway's error.
    pub async fn pay_now(&mut self) -> Result<PaymentLaunch, SubmissionError> {
        let SubmissionState::Succeeded(SubmissionOutcome::PaymentOffered(offer)) = &self.state
        else {
            return Err(SubmissionError::NoPaymentPending);
        };

        let offer = offer.clone();

        self.collect(offer).await
    }

    /// Collect payment for an order created earlier.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NonPositiveAmount`] for a zero or negative amount, or the
    /// gateway's error.
    pub async fn pay_order(
        &mut self,
        order_id: OrderId,
        amount_in_minor_units: i64,
    ) -> Result<PaymentLaunch, SubmissionError> {
        if amount_in_minor_units <= 0 {
            return Err(SubmissionError::NonPositiveAmount);
        }

        self.collect(PaymentOffer {
            order_id,
            amount_in_minor_units,
            currency: self.currency,
        })
        .await
    }

    /// Leave the offered payment for later. Returns the offer that was pending, if any.
    pub fn defer_payment(&mut self) -> Option<PaymentOffer> {
        match std::mem::take(&mut self.state) {
            SubmissionState::Succeeded(SubmissionOutcome::PaymentOffered(offer)) => Some(offer),
            _ => None,
        }
    }

    /// Acknowledge the last outcome and return to idle.
    pub fn dismiss(&mut self) {
        self.state = SubmissionState::Idle;
    }

    fn prepare(&self, draft: &DraftOrder) -> Result<(NewSaleOrder, i64), SubmissionError> {
        let partner = draft.partner().ok_or(SubmissionError::PartnerRequired)?;

        if draft.cart().is_empty() {
            return Err(SubmissionError::EmptyCart);
        }

        let amount = draft.cart().amount_in_minor_units()?;

        let session = match self.sessions.current() {
            Ok(session) => Some(session),
            Err(error) => {
                debug!(%error, "submitting order without an employee id");

                None
            }
        };

        Ok((
            NewSaleOrder::from_cart(partner, draft.cart(), session.as_ref()),
            amount,
        ))
    }

    async fn collect(&mut self, offer: PaymentOffer) -> Result<PaymentLaunch, SubmissionError> {
        let request = PaymentRequest {
            order_id: offer.order_id.clone(),
            amount_in_cents: offer.amount_in_minor_units,
            currency: offer.currency.iso_alpha_code.to_string(),
            employee_id: self
                .sessions
                .current()
                .ok()
                .map(|session| session.employee_id().get()),
        };

        self.state = SubmissionState::AwaitingPayment(offer);

        let result = self.payments.initiate_payment(&request).await;

        if let Err(error) = &result {
            warn!(order_id = %request.order_id, %error, "payment was not started");
        }

        // Runs after failed payments too; holds placed by the ERP can change stock either way.
        if let Err(error) = self.catalog.refresh().await {
            warn!(%error, "failed to refresh products after payment");
        }

        self.state = SubmissionState::Idle;

        result.map_err(SubmissionError::from)
    }
}

impl Debug for OrderSubmitter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderSubmitter")
            .field("currency", &self.currency.iso_alpha_code)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
