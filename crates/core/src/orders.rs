//! Orders
//!
//! Order records as returned by the backend once a cart has been submitted.
//! The backend is the source of truth for ids, status and totals.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{checkout::PaymentMethod, menu::MenuItemId};

/// Server-assigned order identifier.
///
/// Always held as text; numeric ids from the backend are converted on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(#[serde(deserialize_with = "id_from_text_or_number")] String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

impl OrderId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kitchen status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet acknowledged
    Pending,
    /// Acknowledged by the kitchen
    Confirmed,
    /// Being cooked
    Preparing,
    /// Waiting at the counter
    Ready,
    /// Served and closed
    Completed,
    /// Called off
    Cancelled,
}

impl OrderStatus {
    /// Every status.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Statuses an order moves through, in order. Cancelled orders leave the track.
    pub const PROGRESSION: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Label shown on the tracking timeline.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Received",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready for Pickup",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Position on the tracking timeline; `None` for cancelled orders.
    pub fn stage(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|status| *status == self)
    }

    /// No further changes are expected once an order is completed or cancelled.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised order status.
#[derive(Debug, Error, PartialEq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or(UnknownOrderStatus(value))
    }
}

/// Answer to an order-creation request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderCreated {
    /// Assigned order id
    pub order_id: OrderId,

    /// Authoritative amount to pay
    pub total_amount: Decimal,
}

/// Menu item summary nested in an order line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderedMenuItem {
    /// Menu item identifier
    #[serde(default)]
    pub id: Option<MenuItemId>,

    /// Item name
    pub name: String,
}

/// A line of a placed order, priced by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    /// Ordered item
    pub menu_item: OrderedMenuItem,

    /// Units ordered
    pub quantity: u32,

    /// Unit price charged
    pub price: Decimal,
}

impl OrderLine {
    /// `price × quantity`
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A placed order.
///
/// List endpoints may return only the summary columns (id, customer, table,
/// status, total); the remaining fields default when absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Order id
    pub order_id: OrderId,

    /// Customer name
    pub customer_name: String,

    /// Table served
    pub table_number: u32,

    /// Contact phone number
    #[serde(default)]
    pub phone_number: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Payment method chosen at checkout
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Free text for the kitchen
    #[serde(default)]
    pub special_instructions: String,

    /// Current kitchen status
    pub status: OrderStatus,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<OrderLine>,

    /// Sum of line totals
    #[serde(default)]
    pub subtotal: Decimal,

    /// Tax charged
    #[serde(default)]
    pub tax: Decimal,

    /// Delivery fee charged
    #[serde(default)]
    pub delivery_charge: Decimal,

    /// Amount due
    pub total_amount: Decimal,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<Timestamp>,

    /// Last status change
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn stages_follow_progression() {
        assert_eq!(OrderStatus::Pending.stage(), Some(0));
        assert_eq!(OrderStatus::Ready.stage(), Some(3));
        assert_eq!(OrderStatus::Cancelled.stage(), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Preparing".parse::<OrderStatus>(),
            Ok(OrderStatus::Preparing)
        );
        assert_eq!(
            "cancelled".parse::<OrderStatus>(),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            "lost".parse::<OrderStatus>(),
            Err(UnknownOrderStatus("lost".to_string()))
        );
    }

    #[test]
    fn decodes_tracked_order() -> TestResult {
        let order: Order = serde_json::from_value(serde_json::json!({
            "order_id": "ORD-1001",
            "customer_name": "Asha",
            "table_number": 4,
            "phone_number": "9876543210",
            "payment_method": "online",
            "status": "preparing",
            "items": [
                { "menu_item": { "id": 11, "name": "Idli" }, "quantity": 2, "price": "40.00" }
            ],
            "subtotal": "80.00",
            "tax": "4.00",
            "delivery_charge": "30.00",
            "total_amount": "114.00",
            "updated_at": "2026-10-19T08:30:00Z"
        }))?;

        assert_eq!(order.order_id, OrderId::new("ORD-1001"));
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.payment_method, Some(PaymentMethod::Online));
        assert_eq!(
            order.items.first().map(OrderLine::total),
            Some(Decimal::from(80))
        );
        assert_eq!(order.total_amount, Decimal::from(114));
        assert!(order.created_at.is_none());
        assert!(order.updated_at.is_some());

        Ok(())
    }

    #[test]
    fn decodes_summary_rows_from_order_lists() -> TestResult {
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([{
            "order_id": "ORD-1",
            "customer_name": "Asha",
            "table_number": 4,
            "status": "pending",
            "total_amount": "167.00"
        }]))?;

        let [order] = orders.as_slice() else {
            panic!("expected one order, got {}", orders.len());
        };

        assert_eq!(order.order_id.as_str(), "ORD-1");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from(167));
        assert_eq!(order.payment_method, None);
        assert_eq!(order.subtotal, Decimal::ZERO);
        assert!(order.items.is_empty());

        Ok(())
    }

    #[test]
    fn decodes_creation_answer_with_numeric_total() -> TestResult {
        let created: OrderCreated = serde_json::from_value(serde_json::json!({
            "order_id": "ORD-7",
            "total_amount": 167
        }))?;

        assert_eq!(created.order_id.as_str(), "ORD-7");
        assert_eq!(created.total_amount, Decimal::from(167));

        Ok(())
    }

    #[test]
    fn numeric_order_ids_become_text() -> TestResult {
        let created: OrderCreated = serde_json::from_value(serde_json::json!({
            "order_id": 42,
            "total_amount": "30.00"
        }))?;

        assert_eq!(created.order_id, OrderId::new("42"));
        assert_eq!(created.total_amount, Decimal::from(30));

        Ok(())
    }
}
