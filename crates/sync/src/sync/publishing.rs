//! Create-or-update workflows that apply a [`PublishOptions`].
//!
//! Publish fields on the entity are derived from the mode. For products in
//! scheduled mode the entity is made `active` without a `published_at`, and
//! visibility on the storefront is then scheduled through
//! [`publish_to_storefront`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use seo_sync_core::{BlogId, ProductId, ProductStatus, PublishMode, PublishOptions, Publishable};

use super::SyncError;
use super::publication::{PublishOutcome, publish_to_storefront};
use crate::shopify::{
    Article, ArticleInput, Collection, CollectionInput, Lookup, Product, ProductInput,
    StoreClient, StoreError,
};

/// Result of [`publish_product`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedProduct {
    pub product: Product,
    pub is_update: bool,
    /// Set when storefront visibility was scheduled.
    pub publication: Option<PublishOutcome>,
}

/// Create a product, or update the one that already has its handle.
///
/// # Errors
///
/// Returns an error if the create/update fails or, in scheduled mode, if
/// the storefront publication cannot be scheduled.
#[instrument(skip(client, input), fields(handle = input.handle.as_deref()))]
pub async fn publish_product(
    client: &StoreClient,
    input: ProductInput,
    options: PublishOptions,
    now: DateTime<Utc>,
) -> Result<PublishedProduct, StoreError> {
    let input = input.with_publish(options.product_fields(now));

    let existing = match input.handle.as_deref() {
        Some(handle) => client.get_product_by_handle(handle).await.into_option(),
        None => None,
    };

    let (product, is_update) = match existing {
        Some(existing) => {
            let update = ProductInput {
                handle: None,
                ..input
            };
            (client.update_product(existing.id, &update).await?, true)
        }
        None => (client.create_product(&input).await?, false),
    };

    let publication = if options.effective_mode() == PublishMode::Scheduled {
        Some(
            publish_to_storefront(
                client,
                Publishable::Product(product.id),
                options.scheduled_at(),
                now,
            )
            .await?,
        )
    } else {
        None
    };

    info!(product_id = %product.id, is_update, "Product published");
    Ok(PublishedProduct {
        product,
        is_update,
        publication,
    })
}

/// Create a custom collection with publish fields derived from `options`.
///
/// # Errors
///
/// Returns an error if the create fails.
#[instrument(skip(client, input), fields(title = input.title.as_deref()))]
pub async fn publish_collection(
    client: &StoreClient,
    input: CollectionInput,
    options: PublishOptions,
    now: DateTime<Utc>,
) -> Result<Collection, StoreError> {
    let input = input.with_publish(options.collection_fields(now));
    let collection = client.create_collection(&input).await?;
    info!(collection_id = %collection.id, "Collection published");
    Ok(collection)
}

/// Create a custom collection as given, refusing a handle already used by
/// a custom or smart collection.
///
/// # Errors
///
/// Returns `InvalidInput` for a missing title or a taken handle, or the
/// store error if the create fails.
#[instrument(skip(client, input), fields(handle = input.handle.as_deref()))]
pub async fn create_collection(
    client: &StoreClient,
    input: CollectionInput,
) -> Result<Collection, SyncError> {
    if input.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(SyncError::InvalidInput(
            "Collection title is required".to_string(),
        ));
    }

    if let Some(handle) = input.handle.as_deref() {
        // An unavailable lookup falls through to the create.
        if let Lookup::Found(existing) = client.get_collection_by_handle(handle).await {
            return Err(SyncError::InvalidInput(format!(
                "Handle {handle} is already used by collection {}",
                existing.id
            )));
        }
    }

    let collection = client.create_collection(&input).await?;
    info!(collection_id = %collection.id, "Collection created");
    Ok(collection)
}

/// Create an article with publish fields derived from `options`.
///
/// # Errors
///
/// Returns an error if the create fails.
#[instrument(skip(client, input), fields(title = input.title.as_deref()))]
pub async fn publish_article(
    client: &StoreClient,
    blog_id: BlogId,
    input: ArticleInput,
    options: PublishOptions,
    now: DateTime<Utc>,
) -> Result<Article, StoreError> {
    let input = input.with_publish(options.article_fields(now));
    let article = client.create_article(blog_id, &input).await?;
    info!(article_id = %article.id, "Article published");
    Ok(article)
}

/// Make a product active, then publish it on the storefront at `at` (or now).
///
/// # Errors
///
/// Returns an error if the status update or the publication fails.
#[instrument(skip(client))]
pub async fn schedule_product_visibility(
    client: &StoreClient,
    product_id: ProductId,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<PublishOutcome, StoreError> {
    let activate = ProductInput {
        status: Some(ProductStatus::Active),
        ..ProductInput::default()
    };
    client.update_product(product_id, &activate).await?;

    publish_to_storefront(client, Publishable::Product(product_id), at, now).await
}
