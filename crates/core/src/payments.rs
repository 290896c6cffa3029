//! Payments
//!
//! The payment step does not talk to a gateway. It checks the card or UPI
//! details locally, mints a transaction id and records the payment against the
//! order.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orders::OrderId;

/// Instrument used on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChannel {
    /// Credit or debit card
    Card,
    /// Unified Payments Interface
    Upi,
}

/// Payment detail validation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDetailsError {
    /// Card number is not 16 digits.
    #[error("Please enter a valid 16-digit card number")]
    CardNumber,

    /// Cardholder is blank.
    #[error("Please enter cardholder name")]
    CardHolder,

    /// Expiry is not `MM/YY`.
    #[error("Please enter valid expiry date (MM/YY)")]
    Expiry,

    /// CVV is not 3 digits.
    #[error("Please enter valid CVV")]
    Cvv,

    /// UPI id is blank or has no handle.
    #[error("Please enter a valid UPI ID")]
    UpiId,
}

/// Card details as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDetails {
    /// Card number, spaces allowed
    pub number: String,
    /// Name on the card
    pub holder: String,
    /// Expiry as `MM/YY`
    pub expiry: String,
    /// Security code
    pub cvv: String,
}

impl CardDetails {
    /// Build details from raw input, normalising each field the way the form does.
    pub fn from_input(number: &str, holder: &str, expiry: &str, cvv: &str) -> Self {
        Self {
            number: format_card_number(number),
            holder: holder.to_string(),
            expiry: format_expiry(expiry),
            cvv: format_cvv(cvv),
        }
    }

    /// Check the details; the first failing rule is reported.
    ///
    /// # Errors
    ///
    /// Returns the [`PaymentDetailsError`] for the first field that fails.
    pub fn validate(&self) -> Result<(), PaymentDetailsError> {
        let digits: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.len() != 16 {
            return Err(PaymentDetailsError::CardNumber);
        }

        if self.holder.trim().is_empty() {
            return Err(PaymentDetailsError::CardHolder);
        }

        if self.expiry.chars().count() != 5 {
            return Err(PaymentDetailsError::Expiry);
        }

        if self.cvv.chars().count() != 3 {
            return Err(PaymentDetailsError::Cvv);
        }

        Ok(())
    }
}

/// Check a UPI id (`name@handle`).
///
/// # Errors
///
/// Returns [`PaymentDetailsError::UpiId`] when blank or missing the `@`.
pub fn validate_upi_id(upi_id: &str) -> Result<(), PaymentDetailsError> {
    if upi_id.trim().is_empty() || !upi_id.contains('@') {
        return Err(PaymentDetailsError::UpiId);
    }

    Ok(())
}

/// Group a card number into blocks of four: `1234567812345678` becomes `1234 5678 1234 5678`.
pub fn format_card_number(raw: &str) -> String {
    let compact: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();

    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format expiry digits as `MM/YY`.
pub fn format_expiry(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.split_at_checked(2) {
        Some((month, year)) => {
            let year: String = year.iter().take(2).collect();
            format!("{}/{year}", month.iter().collect::<String>())
        }
        None => digits.into_iter().collect(),
    }
}

/// Keep at most three digits of a CVV.
pub fn format_cvv(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(3).collect()
}

/// Locally minted transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Mint `TXN-<unix millis>-<9 uppercase alphanumerics>`.
    pub fn generate<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        let suffix: String = rng
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|byte| char::from(byte).to_ascii_uppercase())
            .collect();

        Self(format!("TXN-{}-{suffix}", now.as_millisecond()))
    }

    /// Mint an id for the current time.
    pub fn new_random() -> Self {
        Self::generate(Timestamp::now(), &mut rand::thread_rng())
    }

    /// Borrow the raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Payment record submitted for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    /// Order being paid
    pub order_id: OrderId,

    /// Transaction reference
    pub transaction_id: TransactionId,

    /// Instrument used
    pub payment_method: PaymentChannel,

    /// Amount paid, as handed over by checkout
    pub amount: Decimal,
}

/// Payment record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentRecord {
    /// Transaction reference
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Payment state reported by the backend
    #[serde(default)]
    pub status: Option<String>,

    /// Amount recorded
    #[serde(default)]
    pub amount: Option<Decimal>,
}
