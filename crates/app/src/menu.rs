//! Menu browsing.

use std::sync::Arc;

use canteen::menu::{MenuFilter, MenuItem, MenuItemId};
use thiserror::Error;

use crate::api::{ApiError, CanteenApi};

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu item {0} not found")]
    NotFound(MenuItemId),

    #[error("{0} is currently unavailable")]
    Unavailable(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct MenuService {
    api: Arc<dyn CanteenApi>,
}

impl MenuService {
    #[must_use]
    pub fn new(api: Arc<dyn CanteenApi>) -> Self {
        Self { api }
    }

    /// Items matching `filter`. The category is narrowed by the backend, the
    /// remaining criteria locally.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call fails.
    pub async fn browse(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, MenuError> {
        let items = if filter.available_only && filter.category.is_none() {
            self.api.list_available_menu_items().await?
        } else {
            self.api.list_menu_items(filter.category).await?
        };

        Ok(filter.apply(&items).into_iter().cloned().collect())
    }

    /// Look up an item that can be added to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NotFound`] for unknown ids and
    /// [`MenuError::Unavailable`] for items that are sold out.
    pub async fn orderable(&self, id: &MenuItemId) -> Result<MenuItem, MenuError> {
        let item = self
            .api
            .list_menu_items(None)
            .await?
            .into_iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| MenuError::NotFound(id.clone()))?;

        if !item.is_available {
            return Err(MenuError::Unavailable(item.name));
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use canteen::menu::{Category, PriceBand};
    use testresult::TestResult;

    use crate::{api::MockCanteenApi, test::helpers::menu_item};

    use super::*;

    fn menu() -> Vec<MenuItem> {
        let mut samosa = menu_item(1, "Samosa", 20);
        samosa.category = Some(Category::Snacks);
        let mut sandwich = menu_item(2, "Club Sandwich", 120);
        sandwich.category = Some(Category::Snacks);
        let mut cutlet = menu_item(3, "Veg Cutlet", 45);
        cutlet.category = Some(Category::Snacks);
        cutlet.is_available = false;

        vec![samosa, sandwich, cutlet]
    }

    #[tokio::test]
    async fn category_is_sent_and_rest_filtered_locally() -> TestResult {
        let mut api = MockCanteenApi::new();
        api.expect_list_menu_items()
            .once()
            .withf(|category| *category == Some(Category::Snacks))
            .return_once(|_| Ok(menu()));

        let filter = MenuFilter {
            category: Some(Category::Snacks),
            search: Some("s".to_string()),
            price_band: Some(PriceBand::Under50),
            available_only: false,
        };

        let items = MenuService::new(Arc::new(api)).browse(&filter).await?;
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();

        assert_eq!(names, ["Samosa"]);

        Ok(())
    }

    #[tokio::test]
    async fn available_only_uses_available_listing() -> TestResult {
        let mut api = MockCanteenApi::new();
        api.expect_list_menu_items().never();
        api.expect_list_available_menu_items()
            .once()
            .return_once(|| Ok(vec![menu_item(1, "Samosa", 20)]));

        let filter = MenuFilter {
            available_only: true,
            ..MenuFilter::default()
        };

        let items = MenuService::new(Arc::new(api)).browse(&filter).await?;

        assert_eq!(items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn sold_out_items_cannot_be_ordered() -> TestResult {
        let mut api = MockCanteenApi::new();
        api.expect_list_menu_items()
            .times(3)
            .returning(|_| Ok(menu()));

        let service = MenuService::new(Arc::new(api));

        let samosa = service.orderable(&MenuItemId::Int(1)).await?;
        let cutlet = service.orderable(&MenuItemId::Int(3)).await;
        let missing = service.orderable(&MenuItemId::Int(99)).await;

        assert_eq!(samosa.name, "Samosa");
        assert!(matches!(cutlet, Err(MenuError::Unavailable(name)) if name == "Veg Cutlet"));
        assert!(matches!(missing, Err(MenuError::NotFound(_))));

        Ok(())
    }
}
