//! Shared fixtures for service tests.

pub(crate) mod helpers;
