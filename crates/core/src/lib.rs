//! Canteen
//!
//! Domain model for a table-service canteen ordering client: the menu, the
//! customer's cart, price derivation, checkout validation and the order and
//! payment records exchanged with the backend.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod pricing;
