//! SEO Sync library.
//!
//! Shopify catalog sync and rate-limited bulk writes: paginated catalog
//! scans, collection membership reconciliation, bulk membership removal and
//! storefront publication scheduling, served as a small JSON API.
//!
//! # Security
//!
//! Requests carry a store access token with full write access to the
//! merchant's catalog. Tokens are held as secrets, redacted from `Debug`
//! output and never logged or persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod sync;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
