//! Newtype IDs for type-safe entity references.
//!
//! Shopify's REST Admin API identifies every resource with a positive 64-bit
//! integer, while the GraphQL Admin API uses global IDs of the form
//! `gid://shopify/Product/123`. The `define_id!` macro creates wrappers that
//! keep the two representations tied to one resource type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The value is neither a number nor a global ID of the expected type.
    #[error("invalid {resource} id: {value}")]
    Invalid {
        resource: &'static str,
        value: String,
    },
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` from a JSON number or from any string `FromStr` accepts
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u64()`, `to_gid()`
/// - `FromStr` accepting either `123` or `gid://shopify/<Resource>/123`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use seo_sync_core::define_id;
/// define_id!(WidgetId, "Widget");
///
/// let id = WidgetId::new(42);
/// assert_eq!(id.to_gid(), "gid://shopify/Widget/42");
/// assert_eq!("gid://shopify/Widget/42".parse::<WidgetId>(), Ok(id));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// GraphQL resource name used in global IDs.
            pub const RESOURCE: &'static str = $resource;

            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Render as a GraphQL global ID.
            #[must_use]
            pub fn to_gid(&self) -> String {
                format!("gid://shopify/{}/{}", $resource, self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(concat!("gid://shopify/", $resource, "/"))
                    .unwrap_or(trimmed);
                digits
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdParseError::Invalid {
                        resource: $resource,
                        value: s.to_string(),
                    })
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl<'de> ::serde::de::Visitor<'de> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                        write!(f, "a {} id as a number or string", $resource)
                    }

                    fn visit_u64<E: ::serde::de::Error>(self, v: u64) -> Result<$name, E> {
                        Ok($name(v))
                    }

                    fn visit_i64<E: ::serde::de::Error>(self, v: i64) -> Result<$name, E> {
                        u64::try_from(v)
                            .map($name)
                            .map_err(|_| E::invalid_value(::serde::de::Unexpected::Signed(v), &self))
                    }

                    fn visit_str<E: ::serde::de::Error>(self, v: &str) -> Result<$name, E> {
                        v.parse().map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId, "Product");
define_id!(VariantId, "ProductVariant");
define_id!(ImageId, "ProductImage");
define_id!(CollectionId, "Collection");
define_id!(CollectId, "Collect");
define_id!(BlogId, "Blog");
define_id!(ArticleId, "Article");
define_id!(ShopId, "Shop");

/// An entity that can be made visible on a sales channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Publishable {
    Product(ProductId),
    Article(ArticleId),
}

impl Publishable {
    /// GraphQL global ID of the underlying entity.
    #[must_use]
    pub fn to_gid(&self) -> String {
        match self {
            Self::Product(id) => id.to_gid(),
            Self::Article(id) => id.to_gid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_gid_and_display() {
        let id = ProductId::new(632_910_392);
        assert_eq!(id.to_string(), "632910392");
        assert_eq!(id.to_gid(), "gid://shopify/Product/632910392");
    }

    #[test]
    fn test_id_parses_plain_and_gid_forms() {
        assert_eq!("841564295".parse::<CollectionId>(), Ok(CollectionId::new(841_564_295)));
        assert_eq!(
            "gid://shopify/Collection/841564295".parse::<CollectionId>(),
            Ok(CollectionId::new(841_564_295))
        );
    }

    #[test]
    fn test_id_rejects_foreign_gid() {
        let err = "gid://shopify/Product/1".parse::<CollectionId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid Collection id: gid://shopify/Product/1");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&CollectId::new(7)).unwrap();
        assert_eq!(json, "7");
        let id: CollectId = serde_json::from_str("7").unwrap();
        assert_eq!(id, CollectId::new(7));
    }

    #[test]
    fn test_id_deserializes_from_strings() {
        let id: ProductId = serde_json::from_str(r#""12""#).unwrap();
        assert_eq!(id, ProductId::new(12));
        let id: ProductId = serde_json::from_str(r#""gid://shopify/Product/12""#).unwrap();
        assert_eq!(id, ProductId::new(12));

        let err = serde_json::from_str::<ProductId>(r#""COPIE_ID""#).unwrap_err();
        assert!(err.to_string().contains("invalid Product id"));
        assert!(serde_json::from_str::<ProductId>("-3").is_err());
    }

    #[test]
    fn test_publishable_gid() {
        assert_eq!(
            Publishable::Article(ArticleId::new(3)).to_gid(),
            "gid://shopify/Article/3"
        );
    }
}
