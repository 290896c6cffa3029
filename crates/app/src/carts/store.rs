//! Cart store.

use std::{fmt, sync::Arc};

use canteen::{
    cart::{Cart, CartLine},
    menu::{MenuItem, MenuItemId},
    pricing::{PriceBreakdown, PricingPolicy},
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::storage::{CART_KEY, KeyValueStore};

/// What the initial read of the cart slot found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A persisted cart with this many lines replaced the in-memory cart.
    Restored(usize),

    /// Nothing was persisted yet.
    Missing,

    /// The slot held data that is not a cart.
    Corrupt,

    /// The slot could not be read at all.
    Unreadable,
}

/// The single owner of the customer's cart, kept in sync with its slot.
///
/// Every mutation rewrites the whole slot. Writes are suppressed until the
/// first [`load`](Self::load) has finished so an empty cart can never
/// clobber state that has not been read yet.
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    loaded: bool,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty, not yet loaded store.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            loaded: false,
        }
    }

    /// Create a store and immediately restore the persisted cart.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Restore the persisted cart.
    ///
    /// A missing, corrupt or unreadable slot leaves the in-memory cart
    /// untouched; none of these are errors. Once the read attempt is over the
    /// current cart is written back, so a corrupt slot is replaced.
    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match self.storage.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => {
                    let lines = cart.len();
                    self.cart = cart;
                    debug!(lines, "restored persisted cart");
                    LoadOutcome::Restored(lines)
                }
                Err(error) => {
                    warn!(%error, "persisted cart is corrupt, starting empty");
                    LoadOutcome::Corrupt
                }
            },
            Ok(None) => {
                debug!("no persisted cart");
                LoadOutcome::Missing
            }
            Err(error) => {
                warn!(%error, "persisted cart is unreadable, starting empty");
                LoadOutcome::Unreadable
            }
        };

        self.loaded = true;
        self.persist();

        outcome
    }

    /// Check whether the initial read has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Add one unit of `item`, appending a new line if it is not in the cart.
    pub fn add(&mut self, item: &MenuItem) {
        self.cart.add(item);
        self.persist();
    }

    /// Remove the line for `id`; unknown ids are ignored.
    pub fn remove(&mut self, id: &MenuItemId) {
        if self.cart.remove(id).is_some() {
            self.persist();
        }
    }

    /// Set the quantity for `id`; zero or less removes the line.
    pub fn update_quantity(&mut self, id: &MenuItemId, quantity: i64) {
        self.cart.update_quantity(id, quantity);
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Price figures for the current cart under `policy`.
    pub fn breakdown(&self, policy: &PricingPolicy) -> PriceBreakdown {
        policy.breakdown(&self.cart)
    }

    fn persist(&self) {
        if !self.loaded {
            debug!("cart not loaded yet, skipping write");
            return;
        }

        let serialized = match serde_json::to_string(&self.cart) {
            Ok(serialized) => serialized,
            Err(error) => {
                warn!(%error, "failed to serialize cart");
                return;
            }
        };

        if let Err(error) = self.storage.set(CART_KEY, &serialized) {
            warn!(%error, "failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use canteen::menu::Category;
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::{
        storage::{MemoryStore, StorageError},
        test::helpers::menu_item,
    };

    use super::*;

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_string(),
                source: std::io::Error::other("disk gone"),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                source: std::io::Error::other("disk gone"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn persisted(storage: &MemoryStore) -> Result<Cart, Box<dyn Error>> {
        let raw = storage
            .get(CART_KEY)?
            .ok_or("cart slot was never written")?;

        Ok(serde_json::from_str(&raw)?)
    }

    #[test]
    fn every_mutation_is_written_through() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(storage.clone());
        let dosa = menu_item(1, "Masala Dosa", 60);
        let coffee = menu_item(2, "Filter Coffee", 25);

        store.add(&dosa);
        store.add(&coffee);
        store.add(&dosa);
        assert_eq!(persisted(&storage)?.lines(), store.lines());

        store.update_quantity(&dosa.id, 5);
        assert_eq!(persisted(&storage)?.item_count(), 6);

        store.remove(&coffee.id);
        assert_eq!(persisted(&storage)?.len(), 1);

        store.clear();
        assert!(persisted(&storage)?.is_empty());

        Ok(())
    }

    #[test]
    fn writes_are_suppressed_until_loaded() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        storage.set(CART_KEY, r#"[{"id":7,"name":"Idli","price":"30","quantity":2}]"#)?;

        let mut store = CartStore::new(storage.clone());
        store.clear();

        assert!(!store.is_loaded());
        assert_eq!(persisted(&storage)?.item_count(), 2);

        let outcome = store.load();

        assert_eq!(outcome, LoadOutcome::Restored(1));
        assert_eq!(store.item_count(), 2);

        Ok(())
    }

    #[test]
    fn missing_slot_starts_empty() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::new(storage.clone());

        assert_eq!(store.load(), LoadOutcome::Missing);
        assert!(store.cart().is_empty());
        assert!(persisted(&storage)?.is_empty());

        Ok(())
    }

    #[test]
    fn corrupt_slot_starts_empty_and_is_replaced() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        storage.set(CART_KEY, "{not json")?;

        let mut store = CartStore::new(storage.clone());

        assert_eq!(store.load(), LoadOutcome::Corrupt);
        assert!(store.cart().is_empty());
        assert!(persisted(&storage)?.is_empty());

        Ok(())
    }

    #[test]
    fn restored_duplicates_are_merged() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        storage.set(
            CART_KEY,
            r#"[
                {"id":1,"name":"Samosa","price":15,"quantity":2},
                {"id":2,"name":"Chai","price":10,"quantity":0},
                {"id":1,"name":"Samosa","price":15,"quantity":3}
            ]"#,
        )?;

        let store = CartStore::open(storage.clone());

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.item_count(), 5);
        assert_eq!(persisted(&storage)?.lines(), store.lines());

        Ok(())
    }

    #[test]
    fn hand_edited_negative_quantity_keeps_the_valid_lines() -> TestResult {
        let storage = Arc::new(MemoryStore::new());
        storage.set(
            CART_KEY,
            r#"[
                {"id":1,"name":"Samosa","price":15,"quantity":2},
                {"id":2,"name":"Chai","price":10,"quantity":-1}
            ]"#,
        )?;

        let mut store = CartStore::new(storage.clone());

        assert_eq!(store.load(), LoadOutcome::Restored(1));
        assert_eq!(store.item_count(), 2);
        assert_eq!(persisted(&storage)?.lines(), store.lines());

        Ok(())
    }

    #[test]
    fn storage_failures_never_surface() {
        let mut store = CartStore::new(Arc::new(BrokenStore));

        assert_eq!(store.load(), LoadOutcome::Unreadable);

        store.add(&menu_item(3, "Vada Pav", 20));

        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn breakdown_tracks_the_cart() {
        let mut store = CartStore::open(Arc::new(MemoryStore::new()));
        let policy = PricingPolicy::default();

        assert_eq!(store.breakdown(&policy).total(), Money::from_major(30, INR));

        let mut thali = menu_item(4, "Thali", 150);
        thali.category = Some(Category::Lunch);
        store.add(&thali);
        store.add(&thali);

        let breakdown = store.breakdown(&policy);

        assert_eq!(store.subtotal(), Decimal::from(300));
        assert_eq!(breakdown.tax(), Money::from_major(15, INR));
        assert!(breakdown.free_delivery());
        assert_eq!(breakdown.total(), Money::from_major(315, INR));
    }
}
