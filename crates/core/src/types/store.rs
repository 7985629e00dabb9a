//! Store credential record.
//!
//! A `Store` identifies one external shop. It is owned by the caller and
//! passed explicitly with every request; nothing in the sync service reads
//! credentials from ambient state or persists them.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Default Admin API version when the caller does not specify one.
pub const DEFAULT_API_VERSION: &str = "2025-01";

/// Credentials and metadata for one Shopify store.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Display name chosen by the merchant.
    #[serde(default)]
    pub name: Option<String>,
    /// Shop domain (e.g. `mystore.myshopify.com`).
    pub shop_domain: String,
    /// Admin API access token (HIGH PRIVILEGE).
    pub access_token: SecretString,
    /// Admin API version (e.g. `2025-01`).
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Whether the merchant marked this store as active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_true() -> bool {
    true
}

impl Store {
    /// Create a store record from the three required credentials.
    #[must_use]
    pub fn new(
        shop_domain: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            shop_domain: shop_domain.into(),
            access_token: SecretString::from(access_token.into()),
            api_version: api_version.into(),
            is_active: true,
            created_at: None,
            last_sync: None,
        }
    }

    /// Whether the domain and access token are both present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.shop_domain.trim().is_empty() && !self.access_token.expose_secret().trim().is_empty()
    }

    /// Origin of the store, `https://{shop_domain}`.
    ///
    /// A domain that already carries a scheme is used verbatim, which lets
    /// local test servers stand in for a shop.
    #[must_use]
    pub fn origin(&self) -> String {
        let domain = self.shop_domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// Base URL of the REST Admin API for this store's API version.
    #[must_use]
    pub fn admin_api_url(&self) -> String {
        format!("{}/admin/api/{}", self.origin(), self.api_version)
    }

    /// The single GraphQL Admin API endpoint.
    #[must_use]
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql.json", self.admin_api_url())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_urls() {
        let store = Store::new("grillz.myshopify.com", "shpat_abc", "2024-10");
        assert_eq!(
            store.admin_api_url(),
            "https://grillz.myshopify.com/admin/api/2024-10"
        );
        assert_eq!(
            store.graphql_url(),
            "https://grillz.myshopify.com/admin/api/2024-10/graphql.json"
        );
    }

    #[test]
    fn test_store_origin_keeps_explicit_scheme() {
        let store = Store::new("http://127.0.0.1:9000/", "token", "2025-01");
        assert_eq!(store.origin(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_store_debug_redacts_token() {
        let store = Store::new("shop.myshopify.com", "shpat_secret", "2025-01");
        let debug = format!("{store:?}");
        assert!(!debug.contains("shpat_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_store_deserializes_camel_case_with_defaults() {
        let store: Store = serde_json::from_str(
            r#"{"shopDomain":"shop.myshopify.com","accessToken":"shpat_x"}"#,
        )
        .unwrap();
        assert_eq!(store.api_version, DEFAULT_API_VERSION);
        assert!(store.is_active);
        assert!(store.has_credentials());
    }

    #[test]
    fn test_store_missing_token_has_no_credentials() {
        let store = Store::new("shop.myshopify.com", "  ", "2025-01");
        assert!(!store.has_credentials());
    }
}
