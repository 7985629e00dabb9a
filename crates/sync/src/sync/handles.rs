//! Bulk product handle updates.
//!
//! Each product is updated through the [`RateLimiter`]. A rejection saying
//! the handle is taken counts as already valid: the product keeps the
//! handle it has, which is what a reset or a re-sent custom handle aims for.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use seo_sync_core::ProductId;

use super::RateLimiter;
use crate::shopify::{StoreApi, StoreError};

/// What to do with each product's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleAction {
    /// Clear the handle so Shopify derives a new one from the title.
    Reset,
    /// Set the handle given with each product.
    Custom,
}

/// A product whose handle should change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandleTarget {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    /// Required for [`HandleAction::Custom`].
    #[serde(default)]
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HandleOutcome {
    Updated { handle: String },
    AlreadyValid,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleResult {
    pub id: ProductId,
    pub title: String,
    #[serde(flatten)]
    pub outcome: HandleOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleStats {
    pub total: usize,
    pub updated: usize,
    pub already_valid: usize,
    pub failed: usize,
}

/// Outcome of [`update_handles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleUpdateSummary {
    pub results: Vec<HandleResult>,
    pub stats: HandleStats,
}

/// Update the handle of every product in `products`, in order.
///
/// Failures are recorded per product; the run never aborts.
#[instrument(skip_all, fields(count = products.len(), ?action))]
pub async fn update_handles<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    products: &[HandleTarget],
    action: HandleAction,
) -> HandleUpdateSummary {
    let mut stats = HandleStats {
        total: products.len(),
        ..HandleStats::default()
    };
    let mut results = Vec::with_capacity(products.len());

    for target in products {
        let outcome = update_one(api, limiter, target, action).await;
        match &outcome {
            HandleOutcome::Updated { .. } => stats.updated += 1,
            HandleOutcome::AlreadyValid => stats.already_valid += 1,
            HandleOutcome::Failed { message } => {
                warn!(product_id = %target.id, error = %message, "Handle update failed");
                stats.failed += 1;
            }
        }
        results.push(HandleResult {
            id: target.id,
            title: target.title.clone(),
            outcome,
        });
    }

    info!(
        updated = stats.updated,
        already_valid = stats.already_valid,
        failed = stats.failed,
        "Product handles updated"
    );
    HandleUpdateSummary { results, stats }
}

async fn update_one<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    target: &HandleTarget,
    action: HandleAction,
) -> HandleOutcome {
    let handle = match action {
        HandleAction::Reset => None,
        HandleAction::Custom => {
            match target.handle.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
                Some(handle) => Some(handle),
                None => {
                    return HandleOutcome::Failed {
                        message: "No handle given".to_string(),
                    };
                }
            }
        }
    };

    match limiter
        .call(|| api.update_product_handle(target.id, handle))
        .await
    {
        Ok(product) => HandleOutcome::Updated {
            handle: product.handle,
        },
        Err(e) if is_handle_taken(&e) => HandleOutcome::AlreadyValid,
        Err(e) => HandleOutcome::Failed {
            message: e.to_string(),
        },
    }
}

fn is_handle_taken(error: &StoreError) -> bool {
    let message = error.to_string().to_lowercase();
    message.contains("handle")
        && ["taken", "already", "exists"]
            .iter()
            .any(|word| message.contains(word))
}
