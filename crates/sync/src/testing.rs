//! In-memory [`StoreApi`] for tests.
//!
//! Lists are served in insertion order with `Link`-style cursors, so
//! pagination behaves like the REST API. Failures can be injected per
//! operation. Unlike Shopify, duplicate collects are accepted, which lets
//! tests observe a duplicate if one were ever created.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use seo_sync_core::{CollectId, CollectionId, CollectionKind, ProductId, Publishable};

use crate::shopify::{
    Collect, Collection, Page, Product, Publication, StoreApi, StoreError, UserError,
};

/// Build a minimal active product.
#[must_use]
pub fn product(id: u64, title: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        handle: title.to_lowercase().replace(' ', "-"),
        body_html: None,
        vendor: None,
        product_type: None,
        tags: Vec::new(),
        status: seo_sync_core::ProductStatus::Active,
        published_at: None,
        images: Vec::new(),
        variants: Vec::new(),
    }
}

/// Build a minimal custom collection.
#[must_use]
pub fn collection(id: u64, title: &str) -> Collection {
    Collection {
        id: CollectionId::new(id),
        title: title.to_string(),
        handle: title.to_lowercase().replace(' ', "-"),
        body_html: None,
        image: None,
        published_at: None,
        kind: CollectionKind::Custom,
    }
}

/// One recorded `publish` mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCall {
    pub target: Publishable,
    pub publication_id: String,
    pub publish_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    products: Vec<Product>,
    collections: Vec<Collection>,
    collects: Vec<Collect>,
    publications: Vec<Publication>,
    next_collect_id: u64,

    failing_product_pages: HashSet<usize>,
    failing_collect_reads: HashSet<ProductId>,
    add_failures: VecDeque<u16>,
    delete_failures: VecDeque<u16>,
    publish_rejection: Option<String>,

    products_page_calls: usize,
    collect_read_calls: usize,
    add_calls: usize,
    delete_calls: usize,
    handle_update_calls: usize,
    publish_calls: Vec<PublishCall>,
}

/// A store held in memory.
pub struct MemoryStore {
    page_size: usize,
    state: Mutex<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            page_size: 250,
            state: Mutex::new(State {
                next_collect_id: 1000,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve lists `size` items at a time.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    #[must_use]
    pub fn with_product(self, product: Product) -> Self {
        self.state().products.push(product);
        self
    }

    #[must_use]
    pub fn with_collection(self, collection: Collection) -> Self {
        self.state().collections.push(collection);
        self
    }

    #[must_use]
    pub fn with_collect(self, product_id: u64, collection_id: u64) -> Self {
        self.insert_collect(ProductId::new(product_id), CollectionId::new(collection_id));
        self
    }

    #[must_use]
    pub fn with_publication(self, id: &str, name: &str) -> Self {
        self.state().publications.push(Publication {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    // Failure injection

    /// Fail the request for the given 0-based page of products.
    pub fn fail_products_page(&self, page: usize) {
        self.state().failing_product_pages.insert(page);
    }

    /// Fail every collect read for one product.
    pub fn fail_collect_reads_for(&self, product_id: u64) {
        self.state()
            .failing_collect_reads
            .insert(ProductId::new(product_id));
    }

    /// Fail the next `count` collect creations with `status`.
    pub fn fail_next_adds(&self, count: usize, status: u16) {
        self.state().add_failures.extend(std::iter::repeat_n(status, count));
    }

    /// Fail the next `count` collect deletions with `status`.
    pub fn fail_next_deletes(&self, count: usize, status: u16) {
        self.state()
            .delete_failures
            .extend(std::iter::repeat_n(status, count));
    }

    /// Answer publish mutations with a user error.
    pub fn reject_publish(&self, message: &str) {
        self.state().publish_rejection = Some(message.to_string());
    }

    // Inspection

    #[must_use]
    pub fn add_calls(&self) -> usize {
        self.state().add_calls
    }

    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.state().delete_calls
    }

    #[must_use]
    pub fn handle_update_calls(&self) -> usize {
        self.state().handle_update_calls
    }

    /// Current handle of a product, if it exists.
    #[must_use]
    pub fn handle_of(&self, product_id: u64) -> Option<String> {
        let product_id = ProductId::new(product_id);
        self.state()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.handle.clone())
    }

    #[must_use]
    pub fn products_page_calls(&self) -> usize {
        self.state().products_page_calls
    }

    #[must_use]
    pub fn collect_read_calls(&self) -> usize {
        self.state().collect_read_calls
    }

    #[must_use]
    pub fn publish_calls(&self) -> Vec<PublishCall> {
        self.state().publish_calls.clone()
    }

    #[must_use]
    pub fn collect_count(&self) -> usize {
        self.state().collects.len()
    }

    /// Number of collects linking the pair (more than one is a duplicate).
    #[must_use]
    pub fn collects_between(&self, product_id: u64, collection_id: u64) -> usize {
        let (product_id, collection_id) =
            (ProductId::new(product_id), CollectionId::new(collection_id));
        self.state()
            .collects
            .iter()
            .filter(|c| c.product_id == product_id && c.collection_id == collection_id)
            .count()
    }

    #[must_use]
    pub fn has_collect(&self, product_id: u64, collection_id: u64) -> bool {
        self.collects_between(product_id, collection_id) > 0
    }

    fn insert_collect(&self, product_id: ProductId, collection_id: CollectionId) -> Collect {
        let mut state = self.state();
        state.next_collect_id += 1;
        let collect = Collect {
            id: CollectId::new(state.next_collect_id),
            product_id,
            collection_id,
            position: None,
        };
        state.collects.push(collect.clone());
        collect
    }

    fn page<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Result<Page<T>, StoreError> {
        let offset = parse_cursor(cursor)?;
        let end = (offset + self.page_size).min(items.len());
        let items_on_page = items.get(offset..end).unwrap_or_default().to_vec();
        let next_cursor = (end < items.len()).then(|| format!("offset-{end}"));
        Ok(Page {
            items: items_on_page,
            next_cursor,
        })
    }
}

fn parse_cursor(cursor: Option<&str>) -> Result<usize, StoreError> {
    cursor.map_or(Ok(0), |c| {
        c.strip_prefix("offset-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| StoreError::Api {
                status: 400,
                body: format!("invalid page_info: {c}"),
            })
    })
}

fn injected(status: u16) -> StoreError {
    StoreError::Api {
        status,
        body: format!("injected failure ({status})"),
    }
}

impl StoreApi for MemoryStore {
    async fn products_page(&self, cursor: Option<&str>) -> Result<Page<Product>, StoreError> {
        let (products, failing) = {
            let mut state = self.state();
            state.products_page_calls += 1;
            (state.products.clone(), state.failing_product_pages.clone())
        };
        let index = parse_cursor(cursor)? / self.page_size;
        if failing.contains(&index) {
            return Err(injected(500));
        }
        self.page(&products, cursor)
    }

    async fn collections_page(
        &self,
        kind: CollectionKind,
        cursor: Option<&str>,
    ) -> Result<Page<Collection>, StoreError> {
        let collections: Vec<Collection> = self
            .state()
            .collections
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect();
        self.page(&collections, cursor)
    }

    async fn collection_products_page(
        &self,
        collection_id: CollectionId,
        cursor: Option<&str>,
    ) -> Result<Page<Product>, StoreError> {
        let members: Vec<Product> = {
            let state = self.state();
            state
                .products
                .iter()
                .filter(|p| {
                    state
                        .collects
                        .iter()
                        .any(|c| c.product_id == p.id && c.collection_id == collection_id)
                })
                .cloned()
                .collect()
        };
        self.page(&members, cursor)
    }

    async fn product_collects_page(
        &self,
        product_id: ProductId,
        cursor: Option<&str>,
    ) -> Result<Page<Collect>, StoreError> {
        let collects: Vec<Collect> = {
            let mut state = self.state();
            state.collect_read_calls += 1;
            if state.failing_collect_reads.contains(&product_id) {
                return Err(injected(500));
            }
            state
                .collects
                .iter()
                .filter(|c| c.product_id == product_id)
                .cloned()
                .collect()
        };
        self.page(&collects, cursor)
    }

    async fn add_product_to_collection(
        &self,
        product_id: ProductId,
        collection_id: CollectionId,
    ) -> Result<Collect, StoreError> {
        {
            let mut state = self.state();
            state.add_calls += 1;
            if let Some(status) = state.add_failures.pop_front() {
                return Err(injected(status));
            }
        }
        Ok(self.insert_collect(product_id, collection_id))
    }

    async fn update_product_handle(
        &self,
        product_id: ProductId,
        handle: Option<&str>,
    ) -> Result<Product, StoreError> {
        let mut state = self.state();
        state.handle_update_calls += 1;
        let Some(index) = state.products.iter().position(|p| p.id == product_id) else {
            return Err(injected(404));
        };
        let handle = match handle {
            Some(handle) => handle.to_string(),
            None => state.products.get(index).map_or_else(String::new, |p| {
                p.title.to_lowercase().replace(' ', "-")
            }),
        };
        if state
            .products
            .iter()
            .any(|p| p.id != product_id && p.handle == handle)
        {
            return Err(StoreError::Api {
                status: 422,
                body: r#"{"errors":{"handle":["has already been taken"]}}"#.to_string(),
            });
        }
        let product = state.products.get_mut(index).ok_or_else(|| injected(404))?;
        product.handle = handle;
        Ok(product.clone())
    }

    async fn remove_product_from_collection(&self, collect_id: CollectId) -> Result<(), StoreError> {
        let mut state = self.state();
        state.delete_calls += 1;
        if let Some(status) = state.delete_failures.pop_front() {
            return Err(injected(status));
        }
        let before = state.collects.len();
        state.collects.retain(|c| c.id != collect_id);
        if state.collects.len() == before {
            return Err(injected(404));
        }
        Ok(())
    }

    async fn publications(&self) -> Result<Vec<Publication>, StoreError> {
        Ok(self.state().publications.clone())
    }

    async fn publish(
        &self,
        target: Publishable,
        publication_id: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.publish_calls.push(PublishCall {
            target,
            publication_id: publication_id.to_string(),
            publish_date,
        });
        match &state.publish_rejection {
            Some(message) => Err(StoreError::UserErrors(vec![UserError {
                field: None,
                message: message.clone(),
            }])),
            None => Ok(()),
        }
    }
}
