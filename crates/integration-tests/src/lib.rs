//! Integration tests for SEO Sync.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seo-sync-integration-tests
//! ```
//!
//! No Shopify store is needed: the sync workflows run against the
//! in-memory store from `seo_sync::testing`, and the HTTP client runs
//! against a local axum server standing in for the Admin API.
//!
//! # Test Categories
//!
//! - `pagination` - cursor walks, partial results
//! - `reconcile` - collection assignment properties
//! - `removal` - bulk membership removal
//! - `publication` - storefront channel scheduling
//! - `publishing` - create-or-update products against a recording server
//! - `catalog_writes` - collection, image and article calls
//! - `store_client` - REST/GraphQL client against a local server
//! - `api` - JSON routes
//! - `catalog_routes` - handle, image, collection and article routes

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, Uri, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use seo_sync::config::SyncConfig;
use seo_sync::routes;
use seo_sync::state::AppState;
use seo_sync::testing::{MemoryStore, collection, product};
use seo_sync_core::Store;

/// Access token the local Admin API server accepts.
pub const TEST_TOKEN: &str = "shpat_integration_test_token";

/// A store with three products, three custom collections and no
/// memberships.
#[must_use]
pub fn catalog() -> MemoryStore {
    MemoryStore::new()
        .with_product(product(1, "Paravent Noir"))
        .with_product(product(2, "Paravent Bois"))
        .with_product(product(3, "Lampe Papier"))
        .with_collection(collection(10, "Paravents"))
        .with_collection(collection(11, "Bois"))
        .with_collection(collection(12, "Luminaires"))
}

/// Serve `router` on an ephemeral local port and return a store pointing
/// at it.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_admin_api(router: Router) -> Store {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    Store::new(format!("http://{addr}"), TEST_TOKEN, "2025-01")
}

/// The service's routes with pacing switched off.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn app() -> Router {
    let config = SyncConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        request_timeout: Duration::from_secs(5),
        call_delay: Duration::ZERO,
        page_delay: Duration::ZERO,
        rate_limit_cooldown: Duration::ZERO,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        json_logs: false,
    };
    routes::routes().with_state(AppState::new(config).expect("Failed to build app state"))
}

/// POST a JSON body to [`app`] and return the status and JSON reply.
///
/// # Panics
///
/// Panics if the request fails or the reply is not JSON.
pub async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    let response = app().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (
        status,
        serde_json::from_slice(&bytes).expect("Reply is not JSON"),
    )
}

/// A request `store` object in the JSON API's camelCase form.
#[must_use]
pub fn store_json(shop_domain: &str, token: &str) -> Value {
    json!({"shopDomain": shop_domain, "accessToken": token, "apiVersion": "2025-01"})
}

/// One request received by a recording test server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the versioned Admin API root.
    pub path: String,
    pub query: String,
    pub body: Value,
}

/// Shared log of everything a recording server received.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    /// Record a request and return it.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    pub fn record(&self, method: &Method, uri: &Uri, body: &[u8]) -> RecordedRequest {
        let request = RecordedRequest {
            method: method.clone(),
            path: uri
                .path()
                .trim_start_matches("/admin/api/2025-01")
                .to_string(),
            query: uri.query().unwrap_or_default().to_string(),
            body: serde_json::from_slice(body).unwrap_or(Value::Null),
        };
        self.0.lock().expect("request log poisoned").push(request.clone());
        request
    }

    /// Bodies of the requests matching `method` and `path`, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    #[must_use]
    pub fn bodies(&self, method: &Method, path: &str) -> Vec<Value> {
        self.matching(method, path)
            .into_iter()
            .map(|r| r.body)
            .collect()
    }

    /// Requests matching `method` and `path`, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    #[must_use]
    pub fn matching(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.0
            .lock()
            .expect("request log poisoned")
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .cloned()
            .collect()
    }
}
