//! Menu

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier of a menu item.
///
/// The backend is free to use integer or string keys, so the cart treats the
/// value as opaque and only compares it for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuItemId {
    /// Numeric primary key
    Int(i64),

    /// String key (slug, uuid, ...)
    Text(String),
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MenuItemId::Int(id) => Display::fmt(id, f),
            MenuItemId::Text(id) => Display::fmt(id, f),
        }
    }
}

impl From<i64> for MenuItemId {
    fn from(value: i64) -> Self {
        MenuItemId::Int(value)
    }
}

impl From<&str> for MenuItemId {
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map_or_else(|_| MenuItemId::Text(value.to_string()), MenuItemId::Int)
    }
}

/// Menu section an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Snacks
    Snacks,
    /// Beverages
    Beverages,
    /// Desserts
    Desserts,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Snacks,
        Category::Beverages,
        Category::Desserts,
    ];

    /// Wire value, as used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Snacks => "snacks",
            Category::Beverages => "beverages",
            Category::Desserts => "desserts",
        }
    }

    /// Human readable section name.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Snacks => "Snacks",
            Category::Beverages => "Beverages",
            Category::Desserts => "Desserts",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.display_name())
    }
}

/// Menu filter input that does not name a known value.
#[derive(Debug, Error, PartialEq)]
pub enum MenuParseError {
    /// Unknown category.
    #[error("unknown category: {0}")]
    Category(String),

    /// Unknown price band.
    #[error("unknown price band: {0}")]
    PriceBand(String),
}

impl FromStr for Category {
    type Err = MenuParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_lowercase();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or(MenuParseError::Category(value))
    }
}

/// An item as served by the menu endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Item identifier
    pub id: MenuItemId,

    /// Display name
    pub name: String,

    /// Description shown under the name
    #[serde(default)]
    pub description: String,

    /// Unit price in whole currency units
    pub price: Decimal,

    /// Menu section, absent for uncategorised items
    ///
    /// Sections this client does not know about decode as `None`, so the item
    /// still lists under "all" and only drops out of section filters.
    #[serde(default, deserialize_with = "known_category")]
    pub category: Option<Category>,

    /// Whether the kitchen is currently serving it
    #[serde(default = "available_by_default")]
    pub is_available: bool,

    /// Image location
    #[serde(default)]
    pub image_url: Option<String>,
}

fn available_by_default() -> bool {
    true
}

pub(crate) fn known_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Menu list payloads.
///
/// Endpoints answer either with a bare array or with a paginated/wrapped
/// envelope; all shapes collapse to a plain list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MenuListing {
    /// Bare array
    Items(Vec<MenuItem>),

    /// `{ "results": [...] }`
    Paginated {
        /// Items on this page
        results: Vec<MenuItem>,
    },

    /// `{ "data": [...] }`
    Wrapped {
        /// Wrapped items
        data: Vec<MenuItem>,
    },
}

impl From<MenuListing> for Vec<MenuItem> {
    fn from(listing: MenuListing) -> Self {
        match listing {
            MenuListing::Items(items)
            | MenuListing::Paginated { results: items }
            | MenuListing::Wrapped { data: items } => items,
        }
    }
}

/// Price filter buckets offered on the menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    /// Below 50
    Under50,
    /// 50 to 100 inclusive
    From50To100,
    /// Above 100 up to and including 200
    From100To200,
    /// Above 200
    Above200,
}

impl PriceBand {
    /// Check whether a price falls into this band.
    pub fn contains(self, price: Decimal) -> bool {
        let fifty = Decimal::from(50);
        let hundred = Decimal::from(100);
        let two_hundred = Decimal::from(200);

        match self {
            PriceBand::Under50 => price < fifty,
            PriceBand::From50To100 => price >= fifty && price <= hundred,
            PriceBand::From100To200 => price > hundred && price <= two_hundred,
            PriceBand::Above200 => price > two_hundred,
        }
    }
}

impl FromStr for PriceBand {
    type Err = MenuParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "under50" => Ok(PriceBand::Under50),
            "50to100" => Ok(PriceBand::From50To100),
            "100to200" => Ok(PriceBand::From100To200),
            "above200" => Ok(PriceBand::Above200),
            other => Err(MenuParseError::PriceBand(other.to_string())),
        }
    }
}

/// Client-side menu filtering.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    /// Only items in this section
    pub category: Option<Category>,

    /// Case-insensitive substring of the item name
    pub search: Option<String>,

    /// Only items within this price band
    pub price_band: Option<PriceBand>,

    /// Hide items the kitchen is not serving
    pub available_only: bool,
}

impl MenuFilter {
    /// Check whether an item passes every configured condition.
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(category) = self.category
            && item.category != Some(category)
        {
            return false;
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty())
            && !item.name.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }

        if let Some(band) = self.price_band
            && !band.contains(item.price)
        {
            return false;
        }

        !self.available_only || item.is_available
    }

    /// Apply the filter, preserving menu order.
    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Payload for creating a menu item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMenuItem {
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Unit price
    pub price: Decimal,
    /// Menu section
    pub category: Category,
    /// Served right away
    pub is_available: bool,
    /// Image location
    pub image_url: String,
}

/// Partial update of a menu item; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuItemUpdate {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// New section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// New availability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl MenuItemUpdate {
    /// Update that flips availability relative to `current`.
    pub fn toggle_availability(current: bool) -> Self {
        Self {
            is_available: Some(!current),
            ..Self::default()
        }
    }
}
