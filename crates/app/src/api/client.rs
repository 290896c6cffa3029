//! HTTP client for the canteen REST API.

use async_trait::async_trait;
use canteen::{
    admin::{DashboardStats, OrderQuery},
    checkout::OrderRequest,
    menu::{Category, MenuItem, MenuItemId, MenuItemUpdate, MenuListing, NewMenuItem},
    orders::{Order, OrderCreated, OrderId, OrderStatus},
    payments::{PaymentRecord, PaymentRequest},
};
use reqwest::{Client, Method, RequestBuilder, header::AUTHORIZATION};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::session::SessionStore;

use super::{ApiError, CanteenApi, Credentials, LoginResponse};

/// [`CanteenApi`] over HTTP.
///
/// Requests carry `Authorization: Token <token>` whenever the session holds a
/// token. Failures are returned to the caller as-is; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpCanteenApi {
    base_url: String,
    http: Client,
    session: SessionStore,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

impl HttpCanteenApi {
    /// Create a client rooted at `base_url`, e.g. `"http://localhost:8000/api"`.
    #[must_use]
    pub fn new(base_url: &str, http: Client, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    /// Base URL every route is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(route));

        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Token {}", token.as_str())),
            None => request,
        }
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.inspect_err(|error| {
            warn!(%error, "api request failed to send");
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = ApiError::from_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), url, %error, "api request rejected");

            return Err(error);
        }

        debug!(status = status.as_u16(), url, "api request succeeded");

        Ok(body.to_vec())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;

        serde_json::from_slice(&body).map_err(|error| {
            warn!(%error, "api response did not decode");
            ApiError::Decode(error)
        })
    }
}

#[async_trait]
impl CanteenApi for HttpCanteenApi {
    async fn list_menu_items(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<MenuItem>, ApiError> {
        let mut request = self.request(Method::GET, "/menu-items/");

        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }

        let listing: MenuListing = self.send(request).await?;

        Ok(listing.into())
    }

    async fn list_available_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        let listing: MenuListing = self
            .send(self.request(Method::GET, "/menu-items/available/"))
            .await?;

        Ok(listing.into())
    }

    async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, ApiError> {
        self.send(self.request(Method::POST, "/menu-items/").json(&item))
            .await
    }

    async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        self.send(
            self.request(Method::PATCH, &format!("/menu-items/{id}/"))
                .json(&update),
        )
        .await
    }

    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError> {
        self.send_raw(self.request(Method::DELETE, &format!("/menu-items/{id}/")))
            .await?;

        Ok(())
    }

    async fn create_order(&self, request: OrderRequest) -> Result<OrderCreated, ApiError> {
        self.send(self.request(Method::POST, "/orders/").json(&request))
            .await
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.send(self.request(Method::GET, &format!("/orders/{order_id}/")))
            .await
    }

    async fn track_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.send(self.request(Method::GET, &format!("/orders/{order_id}/track/")))
            .await
    }

    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        self.send(
            self.request(Method::PATCH, &format!("/orders/{order_id}/update_status/"))
                .json(&StatusUpdate { status }),
        )
        .await
    }

    async fn orders_by_table(&self, table_number: u32) -> Result<Vec<Order>, ApiError> {
        self.send(
            self.request(Method::GET, "/orders/by_table/")
                .query(&[("table_number", table_number)]),
        )
        .await
    }

    async fn process_payment(&self, payment: PaymentRequest) -> Result<PaymentRecord, ApiError> {
        self.send(
            self.request(Method::POST, "/payments/process_payment/")
                .json(&payment),
        )
        .await
    }

    async fn payment_by_order(&self, order_id: OrderId) -> Result<PaymentRecord, ApiError> {
        self.send(
            self.request(Method::GET, "/payments/by_order/")
                .query(&[("order_id", order_id.as_str())]),
        )
        .await
    }

    async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.send(self.request(Method::GET, "/admin/dashboard/"))
            .await
    }

    async fn admin_orders(&self, query: OrderQuery) -> Result<Vec<Order>, ApiError> {
        self.send(
            self.request(Method::GET, "/admin/orders/")
                .query(&query.to_pairs()),
        )
        .await
    }

    async fn login(&self, credentials: Credentials) -> Result<LoginResponse, ApiError> {
        self.send(self.request(Method::POST, "/auth/login/").json(&credentials))
            .await
    }
}
