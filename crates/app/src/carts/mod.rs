//! Carts

mod store;

pub use store::*;
