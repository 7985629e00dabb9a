//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **The access token carried by each `Store` has full write access to the
//! merchant's catalog.** It is passed in per request and never logged or
//! persisted by this crate.
//!
//! # Architecture
//!
//! - REST resource endpoints under `/admin/api/{version}/...json` for
//!   products, collections, collects, blogs/articles and the shop
//! - One GraphQL endpoint for publication channels and publish mutations,
//!   with query bodies built through the `graphql_client` crate
//! - Cursor pagination via the `Link` response header
//! - [`StoreApi`] is the seam the bulk workers are written against
//!
//! # Example
//!
//! ```rust,ignore
//! use seo_sync::shopify::StoreClient;
//!
//! let http = StoreClient::http_client(Duration::from_secs(30))?;
//! let client = StoreClient::new(http, &store);
//!
//! let shop = client.shop().await?;
//! let page = client.product_collects_page(ProductId::new(123), None).await?;
//! ```

mod api;
mod client;
pub mod link;
pub mod queries;
pub mod types;

pub use api::StoreApi;
pub use client::{Lookup, MAX_PAGE_SIZE, StoreClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The network call itself failed (DNS, timeout, connection refused).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A REST call returned a non-success status.
    #[error("Shopify API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The GraphQL endpoint returned a non-success status.
    #[error("Shopify GraphQL error ({status}): {body}")]
    QueryTransport { status: u16, body: String },

    /// GraphQL query returned errors inside a success response.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// User errors from a mutation (e.g., invalid input).
    #[error("User error: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No storefront publication channel exists on the store.
    #[error("Publication channel not found: {0}")]
    ChannelNotFound(String),

    /// The store domain does not form a valid URL.
    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// The access token cannot be sent as a header.
    #[error("Invalid access token header")]
    InvalidToken,
}

impl StoreError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::QueryTransport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether Shopify throttled the call (HTTP 429).
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(429))
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

/// A `userErrors` entry from a mutation payload.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
