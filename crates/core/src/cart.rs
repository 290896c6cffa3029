//! Cart

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::menu::{Category, MenuItem, MenuItemId, known_category};

/// One menu item placed in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Menu item identifier
    pub id: MenuItemId,

    /// Item name at the time it was added
    pub name: String,

    /// Unit price at the time it was added
    pub price: Decimal,

    /// Number of units, never zero inside a [`Cart`]
    #[serde(deserialize_with = "clamped_quantity")]
    pub quantity: u32,

    /// Menu section, kept for display
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "known_category"
    )]
    pub category: Option<Category>,

    /// Image location, kept for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Negative stored quantities read as zero so the line is dropped on restore.
fn clamped_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = i64::deserialize(deserializer)?;

    Ok(u32::try_from(quantity.max(0)).unwrap_or(u32::MAX))
}

impl CartLine {
    /// Start a line for a menu item with a quantity of one.
    pub fn new(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            category: item.category,
            image_url: item.image_url.clone(),
        }
    }

    /// Price of the line, `price × quantity`.
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Ordered set of cart lines keyed by menu item id.
///
/// Insertion order is kept for display. Every id appears at most once and
/// every line holds at least one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines, merging duplicate ids and dropping empty lines.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();

        for line in lines {
            if line.quantity == 0 {
                continue;
            }

            match cart.position(&line.id) {
                Some(index) => {
                    if let Some(existing) = cart.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }

        cart
    }

    /// Add one unit of a menu item.
    ///
    /// An existing line for the same id is incremented; otherwise a new line
    /// is appended with a quantity of one.
    pub fn add(&mut self, item: &MenuItem) {
        match self.line_mut(&item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(item)),
        }
    }

    /// Remove the line for `id`, returning it if present.
    pub fn remove(&mut self, id: &MenuItemId) -> Option<CartLine> {
        self.position(id).map(|index| self.lines.remove(index))
    }

    /// Replace the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &MenuItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(line) = self.line_mut(id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `id`, if present.
    pub fn get(&self, id: &MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across every line.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price × quantity` over every line.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }

    fn position(&self, id: &MenuItemId) -> Option<usize> {
        self.lines.iter().position(|line| &line.id == id)
    }

    fn line_mut(&mut self, id: &MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Cart::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
