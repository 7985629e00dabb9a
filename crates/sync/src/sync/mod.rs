//! Catalog sync and rate-limited bulk operations.
//!
//! Every multi-request sequence here runs strictly sequentially inside one
//! task, paced by a [`RateLimiter`]:
//!
//! - [`pagination`] walks cursor-paginated lists to exhaustion
//! - [`catalog`] reads the catalog and adds single memberships
//! - [`reconcile`] applies classifier suggestions as collection memberships
//! - [`removal`] wipes all memberships and finds unassigned products
//! - [`handles`] resets or sets product handles in bulk
//! - [`publication`] resolves the storefront channel and publishes to it
//! - [`publishing`] creates or updates products, collections and articles
//!
//! Per-item failures are logged and counted; only request-level failures
//! surface as [`SyncError`].

pub mod catalog;
pub mod handles;
pub mod pagination;
pub mod publication;
pub mod publishing;
mod rate_limit;
pub mod reconcile;
pub mod removal;

pub use rate_limit::{
    DEFAULT_CALL_DELAY, DEFAULT_PAGE_DELAY, DEFAULT_RATE_LIMIT_COOLDOWN, RateLimiter,
};

use thiserror::Error;

use crate::shopify::StoreError;

/// Request-level failure of a sync operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A store call the whole operation depends on failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Nothing to work with (no products or no collections).
    #[error("{0}")]
    EmptyCatalog(&'static str),

    /// Caller-supplied parameters are out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A single failed item inside a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    /// What was being processed, e.g. `product 42 -> collection 7`.
    pub item: String,
    pub message: String,
}

impl ItemFailure {
    pub(crate) fn new(item: impl Into<String>, error: &impl std::fmt::Display) -> Self {
        Self {
            item: item.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::EmptyCatalog("No custom collections found");
        assert_eq!(err.to_string(), "No custom collections found");

        let err = SyncError::from(StoreError::ChannelNotFound("Online Store".to_string()));
        assert_eq!(err.to_string(), "Publication channel not found: Online Store");
    }

    #[test]
    fn test_item_failure_serializes() {
        let failure = ItemFailure::new("product 1", &"boom");
        assert_eq!(
            serde_json::to_value(&failure).unwrap_or_default(),
            serde_json::json!({"item": "product 1", "message": "boom"})
        );
    }
}
