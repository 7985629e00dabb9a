//! Full-catalog membership scans: bulk removal and unassigned products.

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{ItemFailure, RateLimiter, pagination};
use crate::shopify::{Product, StoreApi};

/// Counts reported by [`remove_all_collections`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalSummary {
    /// Products whose collects were read successfully.
    pub products_processed: usize,
    pub removed: usize,
    /// Failed collect reads plus failed deletes.
    pub errors: usize,
    pub failures: Vec<ItemFailure>,
}

/// Delete every membership record of every product.
///
/// Destructive and one-way: nothing is restored if the run stops midway.
/// Per-item failures are counted and the run continues.
#[instrument(skip_all)]
pub async fn remove_all_collections<A: StoreApi>(api: &A, limiter: &RateLimiter) -> RemovalSummary {
    let products = pagination::all_products(api, limiter).await;
    info!(products = products.len(), "Removing all collection memberships");

    let mut summary = RemovalSummary::default();

    for product in &products {
        let collects = pagination::product_collects(api, limiter, product.id).await;
        limiter.pace().await;

        let collects = match collects {
            Ok(collects) => collects,
            Err(e) => {
                warn!(product_id = %product.id, error = %e, "Failed to read collects");
                summary.errors += 1;
                summary
                    .failures
                    .push(ItemFailure::new(format!("product {}", product.id), &e));
                continue;
            }
        };
        summary.products_processed += 1;

        for collect in collects {
            match limiter
                .call(|| api.remove_product_from_collection(collect.id))
                .await
            {
                Ok(()) => summary.removed += 1,
                Err(e) => {
                    warn!(
                        product_id = %product.id,
                        collect_id = %collect.id,
                        error = %e,
                        "Failed to delete collect"
                    );
                    summary.errors += 1;
                    summary
                        .failures
                        .push(ItemFailure::new(format!("collect {}", collect.id), &e));
                }
            }
        }
    }

    info!(
        processed = summary.products_processed,
        removed = summary.removed,
        errors = summary.errors,
        "Collection removal complete"
    );
    summary
}

/// Products that belong to no collection.
///
/// Products whose collects cannot be read are logged and left out.
#[instrument(skip_all)]
pub async fn find_unassigned_products<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
) -> Vec<Product> {
    let products = pagination::all_products(api, limiter).await;
    let mut unassigned = Vec::new();

    for product in products {
        let collects = pagination::product_collects(api, limiter, product.id).await;
        limiter.pace().await;

        match collects {
            Ok(collects) if collects.is_empty() => unassigned.push(product),
            Ok(_) => {}
            Err(e) => {
                warn!(product_id = %product.id, error = %e, "Failed to read collects, skipping");
            }
        }
    }

    info!(count = unassigned.len(), "Found unassigned products");
    unassigned
}
