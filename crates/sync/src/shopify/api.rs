//! The store operations the bulk workers are written against.

use std::future::Future;

use chrono::{DateTime, Utc};

use seo_sync_core::{CollectId, CollectionId, CollectionKind, ProductId, Publishable};

use super::{
    StoreClient, StoreError,
    types::{Collect, Collection, Page, Product, Publication},
};

/// Paged reads, membership and handle writes, and publication calls
/// against one store.
///
/// [`StoreClient`] is the HTTP implementation.
pub trait StoreApi: Sync {
    /// Fetch one page of products; `None` requests the first page.
    fn products_page(
        &self,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<Page<Product>, StoreError>> + Send;

    /// Fetch one page of custom or smart collections.
    fn collections_page(
        &self,
        kind: CollectionKind,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<Page<Collection>, StoreError>> + Send;

    /// Fetch one page of the products in a collection.
    fn collection_products_page(
        &self,
        collection_id: CollectionId,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<Page<Product>, StoreError>> + Send;

    /// Fetch one page of a product's membership records.
    fn product_collects_page(
        &self,
        product_id: ProductId,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<Page<Collect>, StoreError>> + Send;

    /// Create a membership record.
    fn add_product_to_collection(
        &self,
        product_id: ProductId,
        collection_id: CollectionId,
    ) -> impl Future<Output = Result<Collect, StoreError>> + Send;

    /// Set a product's handle; `None` regenerates it from the title.
    fn update_product_handle(
        &self,
        product_id: ProductId,
        handle: Option<&str>,
    ) -> impl Future<Output = Result<Product, StoreError>> + Send;

    /// Delete a membership record.
    fn remove_product_from_collection(
        &self,
        collect_id: CollectId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// List sales channel publications.
    fn publications(&self) -> impl Future<Output = Result<Vec<Publication>, StoreError>> + Send;

    /// Publish `target` to a publication, immediately when `publish_date` is `None`.
    fn publish(
        &self,
        target: Publishable,
        publication_id: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl StoreApi for StoreClient {
    async fn products_page(&self, cursor: Option<&str>) -> Result<Page<Product>, StoreError> {
        Self::products_page(self, cursor).await
    }

    async fn collections_page(
        &self,
        kind: CollectionKind,
        cursor: Option<&str>,
    ) -> Result<Page<Collection>, StoreError> {
        Self::collections_page(self, kind, cursor).await
    }

    async fn collection_products_page(
        &self,
        collection_id: CollectionId,
        cursor: Option<&str>,
    ) -> Result<Page<Product>, StoreError> {
        Self::collection_products_page(self, collection_id, cursor).await
    }

    async fn product_collects_page(
        &self,
        product_id: ProductId,
        cursor: Option<&str>,
    ) -> Result<Page<Collect>, StoreError> {
        Self::product_collects_page(self, product_id, cursor).await
    }

    async fn add_product_to_collection(
        &self,
        product_id: ProductId,
        collection_id: CollectionId,
    ) -> Result<Collect, StoreError> {
        Self::add_product_to_collection(self, product_id, collection_id).await
    }

    async fn update_product_handle(
        &self,
        product_id: ProductId,
        handle: Option<&str>,
    ) -> Result<Product, StoreError> {
        Self::update_product_handle(self, product_id, handle).await
    }

    async fn remove_product_from_collection(&self, collect_id: CollectId) -> Result<(), StoreError> {
        Self::remove_product_from_collection(self, collect_id).await
    }

    async fn publications(&self) -> Result<Vec<Publication>, StoreError> {
        Self::publications(self).await
    }

    async fn publish(
        &self,
        target: Publishable,
        publication_id: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        Self::publish(self, target, publication_id, publish_date).await
    }
}
