//! Admin console services.

use std::sync::Arc;

use canteen::{
    admin::{DashboardStats, OrderQuery},
    menu::{MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem},
    orders::{Order, OrderId, OrderStatus},
};
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    api::{ApiError, CanteenApi, Credentials},
    session::SessionStore,
    storage::StorageError,
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("login response did not include a token")]
    MissingToken,

    #[error("please fill in all required fields")]
    IncompleteMenuItem,

    #[error("price cannot be negative")]
    NegativePrice,

    #[error("menu item {0} not found")]
    UnknownMenuItem(MenuItemId),

    #[error("session storage error")]
    Session(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct AdminService {
    api: Arc<dyn CanteenApi>,
    session: SessionStore,
}

impl AdminService {
    #[must_use]
    pub fn new(api: Arc<dyn CanteenApi>, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Exchange credentials for a token and keep it for later requests.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the credentials, answers
    /// without a token, or the token cannot be stored.
    pub async fn login(
        &self,
        username: &str,
        password: Zeroizing<String>,
    ) -> Result<(), AdminError> {
        let response = self
            .api
            .login(Credentials {
                username: username.to_string(),
                password,
            })
            .await?;

        let token = response
            .token
            .map(Zeroizing::new)
            .filter(|token| !token.trim().is_empty())
            .ok_or(AdminError::MissingToken)?;

        self.session.save(&token)?;

        info!(username, "admin logged in");

        Ok(())
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token slot cannot be cleared.
    pub fn logout(&self) -> Result<(), AdminError> {
        self.session.clear()?;

        info!("admin logged out");

        Ok(())
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Figures for the overview.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn dashboard(&self) -> Result<DashboardStats, AdminError> {
        Ok(self.api.dashboard().await?)
    }

    /// Orders matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn orders(&self, query: OrderQuery) -> Result<Vec<Order>, AdminError> {
        Ok(self.api.admin_orders(query).await?)
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        let order = self
            .api
            .update_order_status(order_id, status)
            .await
            .inspect_err(|error| warn!(%error, %status, "order status update failed"))?;

        info!(order_id = %order.order_id, %status, "order status updated");

        Ok(order)
    }

    /// Add a menu item; name and description are required.
    ///
    /// # Errors
    ///
    /// Returns an error for incomplete input without calling the backend, or
    /// when the backend call fails.
    pub async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, AdminError> {
        if item.name.trim().is_empty() || item.description.trim().is_empty() {
            return Err(AdminError::IncompleteMenuItem);
        }

        if item.price.is_sign_negative() {
            return Err(AdminError::NegativePrice);
        }

        let created = self.api.create_menu_item(item).await?;

        info!(id = %created.id, name = %created.name, "menu item created");

        Ok(created)
    }

    /// Flip availability of the menu item `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UnknownMenuItem`] when no item has that id, or an
    /// error when a backend call fails.
    pub async fn toggle_availability(&self, id: &MenuItemId) -> Result<MenuItem, AdminError> {
        let current = self
            .api
            .list_menu_items(None)
            .await?
            .into_iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| AdminError::UnknownMenuItem(id.clone()))?;

        let updated = self
            .api
            .update_menu_item(
                id.clone(),
                MenuItemUpdate::toggle_availability(current.is_available),
            )
            .await?;

        info!(%id, available = updated.is_available, "menu item availability toggled");

        Ok(updated)
    }

    /// Delete the menu item `id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), AdminError> {
        self.api.delete_menu_item(id.clone()).await?;

        info!(%id, "menu item deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use canteen::menu::Category;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        api::{LoginResponse, MockCanteenApi},
        storage::MemoryStore,
        test::helpers::{menu_item, order},
    };

    use super::*;

    fn service(api: MockCanteenApi) -> (AdminService, SessionStore) {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));

        (AdminService::new(Arc::new(api), session.clone()), session)
    }

    fn new_item(name: &str, description: &str) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::from(80),
            category: Category::Snacks,
            is_available: true,
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn login_stores_token_and_logout_clears_it() -> TestResult {
        let mut api = MockCanteenApi::new();
        api.expect_login()
            .once()
            .withf(|credentials| {
                credentials.username == "admin" && credentials.password.as_str() == "hunter2"
            })
            .return_once(|_| {
                Ok(LoginResponse {
                    token: Some("tok-1".to_string()),
                })
            });

        let (admin, session) = service(api);

        admin
            .login("admin", Zeroizing::new("hunter2".to_string()))
            .await?;
        assert!(admin.is_logged_in());
        assert_eq!(session.token().as_deref().map(String::as_str), Some("tok-1"));

        admin.logout()?;
        assert!(!admin.is_logged_in());

        Ok(())
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let mut api = MockCanteenApi::new();
        api.expect_login()
            .once()
            .return_once(|_| Ok(LoginResponse::default()));

        let (admin, _) = service(api);
        let result = admin.login("admin", Zeroizing::new("x".to_string())).await;

        assert!(
            matches!(result, Err(AdminError::MissingToken)),
            "expected MissingToken, got {result:?}"
        );
        assert!(!admin.is_logged_in());
    }

    #[tokio::test]
    async fn incomplete_menu_item_is_not_sent() {
        let mut api = MockCanteenApi::new();
        api.expect_create_menu_item().never();

        let (admin, _) = service(api);

        let blank_name = admin.add_menu_item(new_item(" ", "Crispy")).await;
        let blank_description = admin.add_menu_item(new_item("Pakora", "")).await;

        assert!(matches!(blank_name, Err(AdminError::IncompleteMenuItem)));
        assert!(matches!(blank_description, Err(AdminError::IncompleteMenuItem)));
    }

    #[tokio::test]
    async fn toggle_flips_current_availability() -> TestResult {
        let mut api = MockCanteenApi::new();
        let mut sold_out = menu_item(9, "Gulab Jamun", 40);
        sold_out.is_available = false;
        let listed = vec![menu_item(1, "Tea", 10), sold_out];

        api.expect_list_menu_items()
            .once()
            .return_once(move |_| Ok(listed));
        api.expect_update_menu_item()
            .once()
            .withf(|id, update| *id == MenuItemId::Int(9) && update.is_available == Some(true))
            .return_once(|_, _| Ok(menu_item(9, "Gulab Jamun", 40)));

        let (admin, _) = service(api);
        let updated = admin.toggle_availability(&MenuItemId::Int(9)).await?;

        assert!(updated.is_available);

        Ok(())
    }

    #[tokio::test]
    async fn toggle_unknown_item_fails() {
        let mut api = MockCanteenApi::new();
        api.expect_list_menu_items()
            .once()
            .return_once(|_| Ok(Vec::new()));
        api.expect_update_menu_item().never();

        let (admin, _) = service(api);
        let result = admin.toggle_availability(&MenuItemId::Int(3)).await;

        assert!(
            matches!(result, Err(AdminError::UnknownMenuItem(MenuItemId::Int(3)))),
            "expected UnknownMenuItem, got {result:?}"
        );
    }

    #[tokio::test]
    async fn set_status_returns_updated_order() -> TestResult {
        let mut api = MockCanteenApi::new();
        api.expect_update_order_status()
            .once()
            .withf(|order_id, status| order_id.as_str() == "ORD-8" && *status == OrderStatus::Ready)
            .return_once(|order_id, status| Ok(order(order_id.as_str(), status)));

        let (admin, _) = service(api);
        let updated = admin
            .set_status(OrderId::new("ORD-8"), OrderStatus::Ready)
            .await?;

        assert_eq!(updated.status, OrderStatus::Ready);

        Ok(())
    }
}
