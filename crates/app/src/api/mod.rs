//! Canteen backend API.

use std::fmt;

use async_trait::async_trait;
use canteen::{
    admin::{DashboardStats, OrderQuery},
    checkout::OrderRequest,
    menu::{Category, MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem},
    orders::{Order, OrderCreated, OrderId, OrderStatus},
    payments::{PaymentRecord, PaymentRequest},
};
use mockall::automock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

mod client;
mod errors;

pub use client::HttpCanteenApi;
pub use errors::{ApiError, status_message};

/// Username and password submitted on the login screen.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Admin username
    pub username: String,

    /// Admin password, wiped on drop
    #[serde(serialize_with = "serialize_secret")]
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Zeroizing<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.as_str())
}

/// Login response; a response without a token is a failed login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Session token
    #[serde(default)]
    pub token: Option<String>,
}

/// Every backend call the client makes.
#[automock]
#[async_trait]
pub trait CanteenApi: Send + Sync {
    /// Menu items, optionally narrowed to one category.
    async fn list_menu_items(&self, category: Option<Category>)
    -> Result<Vec<MenuItem>, ApiError>;

    /// Menu items currently available to order.
    async fn list_available_menu_items(&self) -> Result<Vec<MenuItem>, ApiError>;

    /// Create a menu item.
    async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError>;

    /// Partially update a menu item.
    async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, ApiError>;

    /// Delete a menu item.
    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError>;

    /// Place an order; the backend assigns the id and authoritative total.
    async fn create_order(&self, request: OrderRequest) -> Result<OrderCreated, ApiError>;

    /// Fetch an order.
    async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError>;

    /// Fetch an order's current status and lines for the tracking view.
    async fn track_order(&self, order_id: OrderId) -> Result<Order, ApiError>;

    /// Move an order to a new status.
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError>;

    /// Orders placed from one table.
    async fn orders_by_table(&self, table_number: u32) -> Result<Vec<Order>, ApiError>;

    /// Record a payment against an order.
    async fn process_payment(&self, payment: PaymentRequest) -> Result<PaymentRecord, ApiError>;

    /// Payment recorded for an order.
    async fn payment_by_order(&self, order_id: OrderId) -> Result<PaymentRecord, ApiError>;

    /// Aggregate figures for the admin overview.
    async fn dashboard(&self) -> Result<DashboardStats, ApiError>;

    /// Orders for the admin console.
    async fn admin_orders(&self, query: OrderQuery) -> Result<Vec<Order>, ApiError>;

    /// Exchange credentials for a session token.
    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError>;
}
