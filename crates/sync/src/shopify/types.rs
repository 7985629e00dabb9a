//! Domain types for the Shopify REST and GraphQL Admin APIs.
//!
//! Entities are deserialized from REST responses; `*Input` types are the
//! request bodies sent on create/update. Input publication fields use
//! `Option<Option<_>>` so that "leave unchanged" (outer `None`) and "clear"
//! (explicit `null`) stay distinguishable on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use seo_sync_core::{
    ArticleId, ArticlePublishFields, BlogId, CollectId, CollectionId, CollectionKind,
    CollectionPublishFields, ImageId, ProductId, ProductPublishFields, ProductStatus, ShopId,
    VariantId,
};

// =============================================================================
// Pagination
// =============================================================================

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `page_info` cursor of the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product as returned by the REST Admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// Tags, split from Shopify's comma-joined string.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Absent means unpublished.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

/// Input for creating or updating a product.
///
/// All fields are optional - only provided fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_tags"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageInput>,
    /// SEO title (stored by Shopify as a global metafield).
    #[serde(
        default,
        rename = "metafields_global_title_tag",
        alias = "seo_title",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo_title: Option<String>,
    /// SEO meta description.
    #[serde(
        default,
        rename = "metafields_global_description_tag",
        alias = "seo_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo_description: Option<String>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl ProductInput {
    /// Apply publication fields derived from a publish mode.
    #[must_use]
    pub fn with_publish(mut self, fields: ProductPublishFields) -> Self {
        self.status = Some(fields.status);
        self.published_at = Some(fields.published_at);
        self
    }
}

/// Input for a product variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
}

/// Input for an image referenced by URL or uploaded inline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Base64-encoded image body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

// =============================================================================
// Collections
// =============================================================================

/// A custom or smart collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub image: Option<CollectionImage>,
    /// Absent means unpublished.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Not part of Shopify's payload; set from the endpoint it was read from.
    #[serde(rename = "type", default = "default_collection_kind")]
    pub kind: CollectionKind,
}

const fn default_collection_kind() -> CollectionKind {
    CollectionKind::Custom
}

/// Collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionImage {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Input for creating or updating a custom collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// e.g. `manual`, `best-selling`, `alpha-asc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
    #[serde(
        default,
        rename = "metafields_global_title_tag",
        alias = "seo_title",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo_title: Option<String>,
    #[serde(
        default,
        rename = "metafields_global_description_tag",
        alias = "seo_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub seo_description: Option<String>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl CollectionInput {
    /// Apply publication fields derived from a publish mode.
    #[must_use]
    pub fn with_publish(mut self, fields: CollectionPublishFields) -> Self {
        self.published_at = Some(fields.published_at);
        self
    }
}

/// Membership record linking one product to one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collect {
    pub id: CollectId,
    pub product_id: ProductId,
    pub collection_id: CollectionId,
    #[serde(default)]
    pub position: Option<u32>,
}

/// Body of `POST /collects.json`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CollectInput {
    pub product_id: ProductId,
    pub collection_id: CollectionId,
}

// =============================================================================
// Blogs & articles
// =============================================================================

/// A blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    #[serde(default)]
    pub handle: String,
}

/// A blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(default)]
    pub blog_id: Option<BlogId>,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Comma-separated tags, as stored by Shopify.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub summary_html: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Input for creating or updating an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl ArticleInput {
    /// Apply publication fields derived from a publish mode.
    #[must_use]
    pub fn with_publish(mut self, fields: ArticlePublishFields) -> Self {
        self.published = Some(fields.published);
        self.published_at = Some(fields.published_at);
        self
    }
}

// =============================================================================
// Shop & publications
// =============================================================================

/// Subset of `GET /shop.json` used for connection tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub myshopify_domain: Option<String>,
}

/// A sales channel publication (e.g. "Online Store").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// GraphQL global ID (`gid://shopify/Publication/...`).
    pub id: String,
    pub name: String,
}

// =============================================================================
// Tag (de)serialization
// =============================================================================

/// Split Shopify's comma-joined tag string, trimming and dropping duplicates.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(split_tags(&raw))
}

/// Split a comma-joined tag string into unique, trimmed tags.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[allow(clippy::ref_option)]
fn serialize_tags<S>(tags: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match tags {
        Some(tags) => serializer.serialize_str(&tags.join(", ")),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_deserializes_rest_payload() {
        let product: Product = serde_json::from_value(json!({
            "id": 632_910_392,
            "title": "Paravent Noir 3 Panneaux",
            "handle": "paravent-noir-3-panneaux",
            "vendor": "Atelier",
            "product_type": "Paravent",
            "tags": "Bois, Noir,  , Bois",
            "status": "draft",
            "published_at": null,
            "images": [{"id": 850_703_190, "position": 1, "src": "https://cdn/img.png"}],
            "variants": [{"id": 808_950_810, "price": "199.00", "sku": "PAR-3-N", "inventory_quantity": 4}]
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(632_910_392));
        assert_eq!(product.tags, vec!["Bois", "Noir"]);
        assert_eq!(product.status, ProductStatus::Draft);
        assert!(product.published_at.is_none());
        assert_eq!(product.images[0].position, Some(1));
        assert_eq!(product.variants[0].price, Some(Decimal::new(19900, 2)));
    }

    #[test]
    fn test_product_published_at_with_offset() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "T",
            "published_at": "2025-01-10T12:00:00-05:00"
        }))
        .unwrap();
        assert_eq!(
            product.published_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 17, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_product_input_draft_sends_explicit_null() {
        let input = ProductInput {
            title: Some("Paravent".to_string()),
            tags: Some(vec!["Bois".to_string(), "Noir".to_string()]),
            ..Default::default()
        }
        .with_publish(ProductPublishFields {
            status: ProductStatus::Draft,
            published_at: None,
        });

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Paravent",
                "tags": "Bois, Noir",
                "status": "draft",
                "published_at": null
            })
        );
    }

    #[test]
    fn test_product_input_ignores_caller_publish_fields() {
        let input: ProductInput = serde_json::from_value(json!({
            "title": "Paravent",
            "status": "active",
            "published_at": "2025-01-01T00:00:00Z",
            "seo_title": "Paravent noir"
        }))
        .unwrap();
        assert!(input.status.is_none());
        assert!(input.published_at.is_none());
        assert_eq!(input.seo_title.as_deref(), Some("Paravent noir"));

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["metafields_global_title_tag"], "Paravent noir");
    }

    #[test]
    fn test_collection_defaults_to_custom_kind() {
        let collection: Collection = serde_json::from_value(json!({
            "id": 841_564_295,
            "title": "Paravents Noirs",
            "handle": "paravents-noirs"
        }))
        .unwrap();
        assert_eq!(collection.kind, CollectionKind::Custom);
        assert!(collection.published_at.is_none());
    }

    #[test]
    fn test_article_input_scheduled() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let input = ArticleInput {
            title: Some("Guide".to_string()),
            ..Default::default()
        }
        .with_publish(ArticlePublishFields {
            published: false,
            published_at: Some(at),
        });
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["published"], false);
        assert_eq!(value["published_at"], "2025-06-01T08:00:00Z");
    }

    #[test]
    fn test_split_tags() {
        assert!(split_tags("").is_empty());
        assert_eq!(split_tags("a,b , a,,c"), vec!["a", "b", "c"]);
    }
}
