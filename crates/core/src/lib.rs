//! SEO Sync Core - Shared types library.
//!
//! This crate provides the types shared by the sync service and its tests:
//! - typed Shopify REST identifiers
//! - the per-request `Store` credential record
//! - publish modes and the timestamp fields they derive
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, store credentials, statuses and publish modes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
