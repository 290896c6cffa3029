//! Checkout
//!
//! Validation of the customer form and shaping of the order-creation request.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{cart::Cart, menu::MenuItemId};

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Pay at the table when the order arrives
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,

    /// Pay up front through the payment step
    #[serde(rename = "online")]
    Online,
}

impl PaymentMethod {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Online => "online",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::Online => "Online Payment",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Unrecognised payment method.
#[derive(Debug, Error, PartialEq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "cod" => Ok(PaymentMethod::CashOnDelivery),
            "online" => Ok(PaymentMethod::Online),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    /// Customer name
    CustomerName,
    /// Table number
    TableNumber,
    /// Phone number
    PhoneNumber,
}

impl CheckoutField {
    /// Wire/form field name.
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutField::CustomerName => "customer_name",
            CheckoutField::TableNumber => "table_number",
            CheckoutField::PhoneNumber => "phone_number",
        }
    }
}

/// A message attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field
    pub field: CheckoutField,

    /// User facing message
    pub message: &'static str,
}

/// Field-scoped validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(SmallVec<[FieldError; 3]>);

impl FieldErrors {
    /// Message for `field`, if it failed validation.
    pub fn get(&self, field: CheckoutField) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Check whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: CheckoutField, message: &'static str) {
        self.0.push(FieldError { field, message });
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field.as_str(), error.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw customer input as typed on the checkout screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    /// Customer name
    pub customer_name: String,

    /// Table number as typed
    pub table_number: String,

    /// Phone number as typed; separators are allowed
    pub phone_number: String,

    /// Optional email, not format-checked
    pub email: String,

    /// Free text for the kitchen
    pub special_instructions: String,

    /// Chosen payment method
    pub payment_method: PaymentMethod,
}

/// A form that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCheckout {
    customer_name: String,
    table_number: u32,
    phone_number: String,
    email: Option<String>,
    special_instructions: String,
    payment_method: PaymentMethod,
}

impl ValidCheckout {
    /// Customer name as entered
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Parsed table number, at least one
    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    /// Phone number as entered
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Chosen payment method
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

const NAME_REQUIRED: &str = "Name is required";
const TABLE_REQUIRED: &str = "Valid table number is required";
const PHONE_REQUIRED: &str = "Phone number is required";
const PHONE_DIGITS: &str = "Phone number must be 10 digits";
const PHONE_DIGIT_COUNT: usize = 10;

impl CheckoutForm {
    /// Check every rule, collecting a message per failing field.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldErrors`] when any field fails; submission must not
    /// be attempted in that case.
    pub fn validate(&self) -> Result<ValidCheckout, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.customer_name.trim().is_empty() {
            errors.push(CheckoutField::CustomerName, NAME_REQUIRED);
        }

        let table_number = parse_table_number(&self.table_number);
        if table_number.is_none() {
            errors.push(CheckoutField::TableNumber, TABLE_REQUIRED);
        }

        if self.phone_number.trim().is_empty() {
            errors.push(CheckoutField::PhoneNumber, PHONE_REQUIRED);
        } else if phone_digits(&self.phone_number).len() != PHONE_DIGIT_COUNT {
            errors.push(CheckoutField::PhoneNumber, PHONE_DIGITS);
        }

        match table_number {
            Some(table_number) if errors.is_empty() => Ok(ValidCheckout {
                customer_name: self.customer_name.clone(),
                table_number,
                phone_number: self.phone_number.clone(),
                email: Some(self.email.trim())
                    .filter(|email| !email.is_empty())
                    .map(str::to_string),
                special_instructions: self.special_instructions.clone(),
                payment_method: self.payment_method,
            }),
            _ => Err(errors),
        }
    }
}

/// Any number of at least one is accepted; the fractional part is dropped.
fn parse_table_number(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|table| *table >= Decimal::ONE)
        .and_then(|table| table.trunc().to_u32())
}

/// Keep only the ASCII digits of a phone number.
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// One cart line reduced to what the order endpoint accepts.
///
/// Prices are deliberately left out; the backend prices the order itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemRequest {
    /// Menu item identifier
    pub menu_item_id: MenuItemId,

    /// Units ordered
    pub quantity: u32,
}

/// Order-creation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    /// Customer name
    pub customer_name: String,

    /// Table the order is served to
    pub table_number: u32,

    /// Contact phone number
    pub phone_number: String,

    /// Contact email, omitted when not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Free text for the kitchen
    pub special_instructions: String,

    /// Ordered items
    pub items: Vec<OrderItemRequest>,
}

/// Errors shaping an order request.
#[derive(Debug, Error, PartialEq)]
pub enum OrderRequestError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

impl OrderRequest {
    /// Combine a validated form with the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`OrderRequestError::EmptyCart`] when the cart has no lines.
    pub fn new(checkout: &ValidCheckout, cart: &Cart) -> Result<Self, OrderRequestError> {
        if cart.is_empty() {
            return Err(OrderRequestError::EmptyCart);
        }

        Ok(Self {
            customer_name: checkout.customer_name.clone(),
            table_number: checkout.table_number,
            phone_number: checkout.phone_number.clone(),
            email: checkout.email.clone(),
            payment_method: checkout.payment_method,
            special_instructions: checkout.special_instructions.clone(),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItemRequest {
                    menu_item_id: line.id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        })
    }
}
