//! Catalog reads and single-membership writes.

use serde::Serialize;
use tracing::{info, instrument};

use seo_sync_core::{CollectionId, CollectionKind, ProductId};

use super::{RateLimiter, pagination};
use crate::shopify::{Collect, Collection, Product, StoreApi, StoreError};

/// Every product in the store, best-effort.
#[instrument(skip_all)]
pub async fn fetch_all_products<A: StoreApi>(api: &A, limiter: &RateLimiter) -> Vec<Product> {
    let products = pagination::all_products(api, limiter).await;
    info!(count = products.len(), "Fetched products");
    products
}

/// Every custom collection followed by every smart collection, best-effort.
#[instrument(skip_all)]
pub async fn fetch_all_collections<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
) -> Vec<Collection> {
    let mut collections = pagination::all_collections(api, limiter, CollectionKind::Custom).await;
    let custom = collections.len();
    limiter.page_pause().await;
    collections.extend(pagination::all_collections(api, limiter, CollectionKind::Smart).await);

    info!(
        custom,
        smart = collections.len() - custom,
        "Fetched collections"
    );
    collections
}

/// A collection with the products it currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionListing {
    #[serde(flatten)]
    pub collection: Collection,
    pub products_count: usize,
    pub products: Vec<Product>,
}

/// Every collection with its member products, best-effort.
///
/// Collections are walked one after another with the page delay between
/// them.
#[instrument(skip_all)]
pub async fn fetch_collections_with_products<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
) -> Vec<CollectionListing> {
    let collections = fetch_all_collections(api, limiter).await;
    let mut listings = Vec::with_capacity(collections.len());

    for collection in collections {
        limiter.page_pause().await;
        let products = pagination::all_collection_products(api, limiter, collection.id).await;
        listings.push(CollectionListing {
            collection,
            products_count: products.len(),
            products,
        });
    }
    listings
}

/// Result of [`apply_single_suggestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleAssignment {
    pub already_assigned: bool,
    /// The collect created by this call, if any.
    pub collect: Option<Collect>,
}

/// Add one product to one collection unless it is already a member.
///
/// # Errors
///
/// Returns an error if the membership read or the add fails.
#[instrument(skip(api, limiter))]
pub async fn apply_single_suggestion<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    product_id: ProductId,
    collection_id: CollectionId,
) -> Result<SingleAssignment, StoreError> {
    let collects = pagination::product_collects(api, limiter, product_id).await?;

    if collects.iter().any(|c| c.collection_id == collection_id) {
        return Ok(SingleAssignment {
            already_assigned: true,
            collect: None,
        });
    }

    let collect = limiter
        .call(|| api.add_product_to_collection(product_id, collection_id))
        .await?;

    Ok(SingleAssignment {
        already_assigned: false,
        collect: Some(collect),
    })
}
