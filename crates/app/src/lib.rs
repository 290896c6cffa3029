//! Canteen client services, local state and the HTTP collaborator.

pub mod admin;
pub mod api;
pub mod carts;
pub mod checkout;
pub mod config;
pub mod context;
pub mod menu;
pub mod observability;
pub mod payments;
pub mod session;
pub mod storage;
pub mod tracking;

#[cfg(test)]
mod test;
