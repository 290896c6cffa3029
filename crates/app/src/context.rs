//! App Context

use std::{sync::Arc, time::Duration};

use canteen::pricing::PricingPolicy;
use reqwest::Client;
use thiserror::Error;

use crate::{
    admin::AdminService,
    api::{CanteenApi, HttpCanteenApi},
    carts::CartStore,
    checkout::CheckoutService,
    config::ClientConfig,
    menu::MenuService,
    payments::PaymentService,
    session::SessionStore,
    storage::{FileStore, KeyValueStore},
    tracking::OrderTracker,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
}

/// Shared collaborators every command is built from.
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn KeyValueStore>,
    pub api: Arc<dyn CanteenApi>,
    pub session: SessionStore,
    pub pricing: PricingPolicy,
    pub poll_interval: Duration,
}

impl AppContext {
    /// Build the context from configuration: file-backed slots under the data
    /// directory and the HTTP API at the configured URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
        let session = SessionStore::new(Arc::clone(&storage));
        let http = Client::builder()
            .user_agent(concat!("canteen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppInitError::HttpClient)?;
        let api = HttpCanteenApi::new(&config.api_url, http, session.clone());

        Ok(Self::with_parts(
            storage,
            Arc::new(api),
            config.poll_interval(),
        ))
    }

    /// Build the context from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        storage: Arc<dyn KeyValueStore>,
        api: Arc<dyn CanteenApi>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session: SessionStore::new(Arc::clone(&storage)),
            storage,
            api,
            pricing: PricingPolicy::default(),
            poll_interval,
        }
    }

    /// Open the persisted cart.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::open(Arc::clone(&self.storage))
    }

    #[must_use]
    pub fn menu(&self) -> MenuService {
        MenuService::new(Arc::clone(&self.api))
    }

    #[must_use]
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(Arc::clone(&self.api))
    }

    #[must_use]
    pub fn payments(&self) -> PaymentService {
        PaymentService::new(Arc::clone(&self.api))
    }

    #[must_use]
    pub fn tracker(&self) -> OrderTracker {
        OrderTracker::new(Arc::clone(&self.api), self.poll_interval)
    }

    #[must_use]
    pub fn admin(&self) -> AdminService {
        AdminService::new(Arc::clone(&self.api), self.session.clone())
    }
}
