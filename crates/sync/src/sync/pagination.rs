//! Cursor pagination over REST list endpoints.
//!
//! Pages are requested in cursor order and appended in that order, with
//! the limiter's page delay between requests. Two failure policies:
//!
//! - [`collect_all`] is best-effort: a failed page ends the walk and the
//!   items gathered so far are returned, with the failure only logged.
//!   Callers cannot tell a partial list from a complete one.
//! - [`try_collect_all`] is strict and propagates the failure. Membership
//!   reads use it, since acting on a partial list of collects could create
//!   duplicates or leave records behind.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, warn};

use seo_sync_core::{CollectionId, CollectionKind, ProductId};

use super::RateLimiter;
use crate::shopify::{Collect, Collection, Page, Product, StoreApi, StoreError};

/// Fetch every page, stopping at the first failure and keeping what was read.
pub async fn collect_all<T, F, Fut>(limiter: &RateLimiter, resource: &str, fetch: F) -> Vec<T>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, StoreError>>,
{
    let (items, failure) = walk(limiter, fetch).await;
    if let Some(e) = failure {
        warn!(
            resource,
            fetched = items.len(),
            error = %e,
            "Pagination aborted, returning partial results"
        );
    }
    items
}

/// Fetch every page, failing if any page fails.
///
/// # Errors
///
/// Returns the first page error.
pub async fn try_collect_all<T, F, Fut>(limiter: &RateLimiter, fetch: F) -> Result<Vec<T>, StoreError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, StoreError>>,
{
    match walk(limiter, fetch).await {
        (items, None) => Ok(items),
        (_, Some(e)) => Err(e),
    }
}

async fn walk<T, F, Fut>(limiter: &RateLimiter, mut fetch: F) -> (Vec<T>, Option<StoreError>)
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, StoreError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();
    let mut pages = 0_usize;

    loop {
        let page = match fetch(cursor.clone()).await {
            Ok(page) => page,
            Err(e) => return (items, Some(e)),
        };
        pages += 1;
        items.extend(page.items);

        match page.next_cursor {
            // A cursor pointing back at any page already read would loop forever.
            Some(next) if !seen.insert(next.clone()) => {
                warn!(pages, cursor = %next, "Next-page cursor was already followed, stopping");
                break;
            }
            Some(next) => {
                cursor = Some(next);
                limiter.page_pause().await;
            }
            None => break,
        }
    }

    debug!(pages, items = items.len(), "Pagination complete");
    (items, None)
}

/// Every product in the store, best-effort.
pub async fn all_products<A: StoreApi>(api: &A, limiter: &RateLimiter) -> Vec<Product> {
    collect_all(limiter, "products", move |cursor| async move {
        api.products_page(cursor.as_deref()).await
    })
    .await
}

/// Every collection of one kind, best-effort.
pub async fn all_collections<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    kind: CollectionKind,
) -> Vec<Collection> {
    collect_all(limiter, kind.resource(), move |cursor| async move {
        api.collections_page(kind, cursor.as_deref()).await
    })
    .await
}

/// Every product in one collection, best-effort.
pub async fn all_collection_products<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    collection_id: CollectionId,
) -> Vec<Product> {
    collect_all(limiter, "collection products", move |cursor| async move {
        api.collection_products_page(collection_id, cursor.as_deref())
            .await
    })
    .await
}

/// Every membership record of one product.
///
/// # Errors
///
/// Returns an error if any page fails.
pub async fn product_collects<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    product_id: ProductId,
) -> Result<Vec<Collect>, StoreError> {
    try_collect_all(limiter, move |cursor| async move {
        api.product_collects_page(product_id, cursor.as_deref())
            .await
    })
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    /// Serves `pages` in order; page `i` links to `c{i+1}`. `fail_at` makes
    /// that (0-based) request fail.
    struct Pages {
        pages: Vec<Vec<u32>>,
        fail_at: Option<usize>,
        requested: RefCell<Vec<Option<String>>>,
    }

    impl Pages {
        fn new(pages: Vec<Vec<u32>>) -> Self {
            Self {
                pages,
                fail_at: None,
                requested: RefCell::new(Vec::new()),
            }
        }

        fn fetch(&self, cursor: Option<String>) -> Result<Page<u32>, StoreError> {
            let index = cursor
                .as_deref()
                .map_or(0, |c| c.trim_start_matches('c').parse::<usize>().unwrap());
            self.requested.borrow_mut().push(cursor);
            if self.fail_at == Some(index) {
                return Err(StoreError::Api {
                    status: 500,
                    body: "Internal Server Error".to_string(),
                });
            }
            let next_cursor = (index + 1 < self.pages.len()).then(|| format!("c{}", index + 1));
            Ok(Page {
                items: self.pages[index].clone(),
                next_cursor,
            })
        }
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let pages = Pages::new(vec![vec![1, 2], vec![3, 4], vec![5]]);
        let items = collect_all(&RateLimiter::unpaced(), "numbers", |cursor| {
            std::future::ready(pages.fetch(cursor))
        })
        .await;

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *pages.requested.borrow(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_first_page_terminates() {
        let pages = Pages::new(vec![vec![]]);
        let items = collect_all(&RateLimiter::unpaced(), "numbers", |cursor| {
            std::future::ready(pages.fetch(cursor))
        })
        .await;

        assert!(items.is_empty());
        assert_eq!(pages.requested.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_partial_results() {
        let mut pages = Pages::new(vec![vec![1], vec![2], vec![3], vec![4], vec![5]]);
        pages.fail_at = Some(2);

        let items = collect_all(&RateLimiter::unpaced(), "numbers", |cursor| {
            std::future::ready(pages.fetch(cursor))
        })
        .await;

        assert_eq!(items, vec![1, 2]);
        assert_eq!(pages.requested.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_strict_propagates_failure() {
        let mut pages = Pages::new(vec![vec![1], vec![2]]);
        pages.fail_at = Some(1);

        let result = try_collect_all(&RateLimiter::unpaced(), |cursor| {
            std::future::ready(pages.fetch(cursor))
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(500));
    }

    #[tokio::test]
    async fn test_repeated_cursor_stops() {
        let calls = RefCell::new(0);
        let items = collect_all(&RateLimiter::unpaced(), "numbers", |_| {
            *calls.borrow_mut() += 1;
            std::future::ready(Ok(Page {
                items: vec![1],
                next_cursor: Some("same".to_string()),
            }))
        })
        .await;

        assert_eq!(items, vec![1, 1]);
        assert_eq!(*calls.borrow(), 2);
    }

    #[tokio::test]
    async fn test_cursor_cycle_stops() {
        let requested = RefCell::new(Vec::new());
        let items = collect_all(&RateLimiter::unpaced(), "numbers", |cursor: Option<String>| {
            let next = match cursor.as_deref() {
                Some("a") => "b",
                _ => "a",
            };
            requested.borrow_mut().push(cursor);
            std::future::ready(Ok(Page {
                items: vec![requested.borrow().len()],
                next_cursor: Some(next.to_string()),
            }))
        })
        .await;

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(
            *requested.borrow(),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_pages_only() {
        let limiter = RateLimiter::new(Duration::ZERO, Duration::from_millis(500), Duration::ZERO);
        let pages = Pages::new(vec![vec![1], vec![2], vec![3]]);
        let start = Instant::now();

        collect_all(&limiter, "numbers", |cursor| {
            std::future::ready(pages.fetch(cursor))
        })
        .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
    }
}
