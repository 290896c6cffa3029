//! Admin
//!
//! Read models for the admin console.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::orders::OrderStatus;

/// Aggregate figures shown on the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    /// Orders placed
    pub total_orders: u64,

    /// Revenue across paid orders
    pub total_revenue: Decimal,

    /// Orders not yet completed
    pub pending_orders: u64,

    /// Orders completed
    pub completed_orders: u64,
}

/// Filters for the admin order listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    /// Only orders in this status
    pub status: Option<OrderStatus>,

    /// Only orders placed on this day
    pub date: Option<Date>,
}

impl OrderQuery {
    /// Query string pairs for the filters that are set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);

        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }

        if let Some(date) = self.date {
            pairs.push(("date", date.to_string()));
        }

        pairs
    }
}
