//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Health check
//!
//! # Shopify (every body carries `store`)
//! POST /api/shopify/test-connection              - Verify credentials
//! POST /api/shopify/sync-products                - List all products
//! POST /api/shopify/sync-collections             - List all collections
//! POST /api/shopify/unassigned-products          - Products in no collection
//! POST /api/shopify/apply-suggestion             - Add one product to one collection
//! POST /api/shopify/ai-assign-collections        - Apply classifier suggestions
//! POST /api/shopify/remove-all-collections       - Delete every membership
//! POST /api/shopify/publish-product              - Create or update a product
//! POST /api/shopify/publish-collection           - Create a collection
//! POST /api/shopify/publish-article              - Create a blog article
//! POST /api/shopify/schedule-product-visibility  - Publish a product on the storefront
//! ```

pub mod shopify;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(shopify::router())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
