//! Application state shared across handlers.

use std::sync::Arc;

use seo_sync_core::Store;

use crate::config::SyncConfig;
use crate::error::AppError;
use crate::shopify::{StoreClient, StoreError};
use crate::sync::RateLimiter;

/// Application state shared across all handlers.
///
/// Holds no store credentials: a [`StoreClient`] is built per request from
/// the store the request names, sharing one connection pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SyncConfig,
    http: reqwest::Client,
    limiter: RateLimiter,
}

impl AppState {
    /// Create the state, building the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SyncConfig) -> Result<Self, StoreError> {
        let http = StoreClient::http_client(config.request_timeout)?;
        let limiter = config.rate_limiter();
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                http,
                limiter,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    /// Build a client for the store named in a request.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the store is missing its domain or token.
    pub fn client_for(&self, store: &Store) -> Result<StoreClient, AppError> {
        if !store.has_credentials() {
            return Err(AppError::BadRequest(
                "Store domain and access token are required".to_string(),
            ));
        }
        Ok(StoreClient::new(self.inner.http.clone(), store))
    }
}
