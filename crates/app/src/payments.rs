//! Payment step for online orders.
//!
//! There is no gateway: details are validated locally, a transaction id is
//! minted on the client and the record is posted to the backend.

use std::sync::Arc;

use canteen::{
    orders::OrderId,
    payments::{
        CardDetails, PaymentChannel, PaymentDetailsError, PaymentRecord, PaymentRequest,
        TransactionId, validate_upi_id,
    },
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    api::{ApiError, CanteenApi},
    checkout::PaymentHandoff,
};

/// Errors raised while paying for an order.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Entered details failed validation; nothing was sent.
    #[error(transparent)]
    Details(#[from] PaymentDetailsError),

    /// The backend did not record the payment.
    #[error("payment failed: {0}")]
    Api(#[from] ApiError),
}

/// Details entered on the payment screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInput {
    /// Card payment
    Card(CardDetails),

    /// UPI payment
    Upi(String),
}

impl PaymentInput {
    /// Channel reported to the backend.
    #[must_use]
    pub fn channel(&self) -> PaymentChannel {
        match self {
            Self::Card(_) => PaymentChannel::Card,
            Self::Upi(_) => PaymentChannel::Upi,
        }
    }

    /// Check the entered details.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), PaymentDetailsError> {
        match self {
            Self::Card(card) => card.validate(),
            Self::Upi(upi_id) => validate_upi_id(upi_id),
        }
    }
}

/// A payment the backend accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// Transaction id minted for this attempt
    pub transaction_id: TransactionId,

    /// Backend record
    pub record: PaymentRecord,
}

#[derive(Clone)]
pub struct PaymentService {
    api: Arc<dyn CanteenApi>,
}

impl PaymentService {
    #[must_use]
    pub fn new(api: Arc<dyn CanteenApi>) -> Self {
        Self { api }
    }

    /// Pay the amount handed off by checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Details`] before any request when the details
    /// are invalid, or [`PaymentError::Api`] when the backend call fails.
    #[instrument(skip_all, fields(order_id = %handoff.order_id, channel = ?input.channel()))]
    pub async fn pay(
        &self,
        handoff: &PaymentHandoff,
        input: &PaymentInput,
    ) -> Result<PaymentReceipt, PaymentError> {
        input.validate().inspect_err(|error| {
            info!(%error, "payment details rejected");
        })?;

        let transaction_id = TransactionId::new_random();
        let request = PaymentRequest {
            order_id: handoff.order_id.clone(),
            transaction_id: transaction_id.clone(),
            payment_method: input.channel(),
            amount: handoff.amount,
        };

        let record = self.api.process_payment(request).await.inspect_err(|error| {
            warn!(%error, %transaction_id, "payment was not recorded");
        })?;

        info!(%transaction_id, amount = %handoff.amount, "payment recorded");

        Ok(PaymentReceipt {
            transaction_id,
            record,
        })
    }

    /// Payment recorded for an order.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn payment_for(&self, order_id: OrderId) -> Result<PaymentRecord, PaymentError> {
        Ok(self.api.payment_by_order(order_id).await?)
    }
}
