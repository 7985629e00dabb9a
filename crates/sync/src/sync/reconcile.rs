//! Apply classifier-suggested collection memberships without duplicates.
//!
//! Suggestions name collections by title. Each title is resolved by exact
//! match against the store's custom collections; anything that does not
//! match is dropped and reported, never guessed. Resolved targets scoring
//! at or above the threshold are then added, one product at a time:
//!
//! 1. read the product's collects once (strict, fully paginated)
//! 2. skip targets that already have a collect
//! 3. add the rest through the rate limiter, updating the cached set
//!
//! A failed read skips that product's targets; a failed add is recorded
//! and the run moves on.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use seo_sync_core::{CollectionId, CollectionKind, ProductId};

use super::{ItemFailure, RateLimiter, SyncError, pagination};
use crate::shopify::{Collection, Product, StoreApi};

/// Default minimum score for a suggestion to be applied.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;
/// Score at which a suggestion counts as high confidence in the stats.
pub const HIGH_CONFIDENCE_SCORE: f64 = 0.7;
/// Score assumed when the classifier omitted one.
pub const DEFAULT_SUGGESTION_SCORE: f64 = 0.8;
/// Reasoning assumed when the classifier omitted it.
pub const DEFAULT_REASONING: &str = "AI analysis";

/// Raw classifier output for one product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub product_id: ProductId,
    /// Candidate collection titles, in preference order.
    #[serde(alias = "collections")]
    pub collection_titles: Vec<String>,
    /// One score per title; missing entries use [`DEFAULT_SUGGESTION_SCORE`].
    #[serde(default, alias = "confidenceScores")]
    pub scores: Vec<f64>,
    /// One justification per title; missing entries use [`DEFAULT_REASONING`].
    #[serde(default)]
    pub reasoning: Vec<String>,
}

/// One resolved target collection for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTarget {
    pub collection_id: CollectionId,
    pub collection_title: String,
    pub score: f64,
    pub reasoning: String,
}

/// A product and its resolved target collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub product_id: ProductId,
    pub product_title: String,
    pub targets: Vec<MatchTarget>,
}

/// A suggested title that named no known custom collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedTitle {
    pub product_id: ProductId,
    pub title: String,
}

/// Tuning for one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    /// Minimum score, inclusive.
    #[serde(alias = "confidenceThreshold")]
    pub threshold: f64,
    /// Keep at most this many targets per product, in the order given.
    #[serde(alias = "maxSuggestionsPerProduct")]
    pub max_per_product: Option<usize>,
    /// When false (the default), only analyse: nothing is written.
    pub auto_apply: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_per_product: None,
            auto_apply: false,
        }
    }
}

impl ReconcileOptions {
    fn validate(&self) -> Result<(), SyncError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SyncError::InvalidInput(format!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }
        if self.max_per_product == Some(0) {
            return Err(SyncError::InvalidInput(
                "maxSuggestionsPerProduct must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A membership created by this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedAssignment {
    pub product_id: ProductId,
    pub product_title: String,
    pub collection_id: CollectionId,
    pub collection_title: String,
    pub score: f64,
    pub reasoning: String,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileStats {
    pub total_products: usize,
    pub total_collections: usize,
    pub products_with_matches: usize,
    pub total_suggestions: usize,
    pub high_confidence_suggestions: usize,
    pub applied: usize,
}

/// Result of applying matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub applied: Vec<AppliedAssignment>,
    /// Targets skipped because the collect already existed.
    pub already_assigned: usize,
    pub failures: Vec<ItemFailure>,
}

/// Full, auditable result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub stats: ReconcileStats,
    pub matches: Vec<Match>,
    pub unresolved: Vec<UnresolvedTitle>,
    pub applied: Vec<AppliedAssignment>,
    pub already_assigned: usize,
    pub failures: Vec<ItemFailure>,
}

/// Resolve suggestions into matches against the known catalog.
///
/// Suggestions for the same product are merged, suggestions for unknown
/// products are dropped, and a collection is targeted at most once per
/// product. Titles must match a custom collection exactly; when two
/// collections share a title the first one listed wins.
#[must_use]
pub fn resolve_matches(
    suggestions: &[Suggestion],
    products: &[Product],
    collections: &[Collection],
    max_per_product: Option<usize>,
) -> (Vec<Match>, Vec<UnresolvedTitle>) {
    let product_titles: HashMap<ProductId, &str> =
        products.iter().map(|p| (p.id, p.title.as_str())).collect();

    let mut by_title: HashMap<&str, &Collection> = HashMap::new();
    for collection in collections
        .iter()
        .filter(|c| c.kind == CollectionKind::Custom)
    {
        by_title.entry(collection.title.as_str()).or_insert(collection);
    }

    let mut matches: Vec<Match> = Vec::new();
    let mut unresolved = Vec::new();

    for suggestion in suggestions {
        let Some(product_title) = product_titles.get(&suggestion.product_id) else {
            warn!(product_id = %suggestion.product_id, "Suggestion for unknown product dropped");
            continue;
        };

        let index = match matches
            .iter()
            .position(|m| m.product_id == suggestion.product_id)
        {
            Some(index) => index,
            None => {
                matches.push(Match {
                    product_id: suggestion.product_id,
                    product_title: (*product_title).to_string(),
                    targets: Vec::new(),
                });
                matches.len() - 1
            }
        };
        let entry = &mut matches[index];

        for (i, title) in suggestion.collection_titles.iter().enumerate() {
            let Some(collection) = by_title.get(title.as_str()) else {
                warn!(
                    product_id = %suggestion.product_id,
                    title = %title,
                    "Suggested collection does not exist, dropped"
                );
                unresolved.push(UnresolvedTitle {
                    product_id: suggestion.product_id,
                    title: title.clone(),
                });
                continue;
            };

            if entry.targets.iter().any(|t| t.collection_id == collection.id) {
                continue;
            }

            entry.targets.push(MatchTarget {
                collection_id: collection.id,
                collection_title: collection.title.clone(),
                score: suggestion
                    .scores
                    .get(i)
                    .copied()
                    .unwrap_or(DEFAULT_SUGGESTION_SCORE),
                reasoning: suggestion
                    .reasoning
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
            });
        }
    }

    if let Some(max) = max_per_product {
        for m in &mut matches {
            m.targets.truncate(max);
        }
    }

    (matches, unresolved)
}

/// Add every target scoring at or above `threshold` that is not already a
/// member.
#[instrument(skip_all, fields(products = matches.len(), threshold = threshold))]
pub async fn apply_matches<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    matches: &[Match],
    threshold: f64,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for m in matches {
        let eligible: Vec<&MatchTarget> =
            m.targets.iter().filter(|t| t.score >= threshold).collect();
        if eligible.is_empty() {
            continue;
        }

        let collects = pagination::product_collects(api, limiter, m.product_id).await;
        limiter.pace().await;
        let mut existing: HashSet<CollectionId> = match collects {
            Ok(collects) => collects.into_iter().map(|c| c.collection_id).collect(),
            Err(e) => {
                warn!(product_id = %m.product_id, error = %e, "Failed to read collects, skipping product");
                outcome.failures.extend(eligible.iter().map(|t| {
                    ItemFailure::new(pair_label(m.product_id, t.collection_id), &e)
                }));
                continue;
            }
        };

        for target in eligible {
            if existing.contains(&target.collection_id) {
                debug!(
                    product_id = %m.product_id,
                    collection_id = %target.collection_id,
                    "Already assigned"
                );
                outcome.already_assigned += 1;
                continue;
            }

            let result = limiter
                .call(|| api.add_product_to_collection(m.product_id, target.collection_id))
                .await;

            match result {
                Ok(_) => {
                    existing.insert(target.collection_id);
                    outcome.applied.push(AppliedAssignment {
                        product_id: m.product_id,
                        product_title: m.product_title.clone(),
                        collection_id: target.collection_id,
                        collection_title: target.collection_title.clone(),
                        score: target.score,
                        reasoning: target.reasoning.clone(),
                    });
                }
                Err(e) => {
                    warn!(
                        product_id = %m.product_id,
                        collection_id = %target.collection_id,
                        error = %e,
                        "Failed to add product to collection"
                    );
                    outcome
                        .failures
                        .push(ItemFailure::new(pair_label(m.product_id, target.collection_id), &e));
                }
            }
        }
    }

    outcome
}

/// Fetch the catalog, resolve suggestions and (unless dry-running) apply
/// them.
///
/// # Errors
///
/// Returns an error if the options are out of range or the store has no
/// products or no custom collections. Per-item failures are reported in
/// the result instead.
#[instrument(skip_all, fields(suggestions = suggestions.len()))]
pub async fn run<A: StoreApi>(
    api: &A,
    limiter: &RateLimiter,
    suggestions: &[Suggestion],
    options: ReconcileOptions,
) -> Result<ReconcileReport, SyncError> {
    options.validate()?;

    let products = pagination::all_products(api, limiter).await;
    if products.is_empty() {
        return Err(SyncError::EmptyCatalog("No products found in store"));
    }

    let collections = pagination::all_collections(api, limiter, CollectionKind::Custom).await;
    if collections.is_empty() {
        return Err(SyncError::EmptyCatalog("No custom collections found in store"));
    }

    let (matches, unresolved) =
        resolve_matches(suggestions, &products, &collections, options.max_per_product);

    let mut stats = ReconcileStats {
        total_products: products.len(),
        total_collections: collections.len(),
        products_with_matches: matches.iter().filter(|m| !m.targets.is_empty()).count(),
        total_suggestions: matches.iter().map(|m| m.targets.len()).sum(),
        high_confidence_suggestions: matches
            .iter()
            .flat_map(|m| &m.targets)
            .filter(|t| t.score >= HIGH_CONFIDENCE_SCORE)
            .count(),
        applied: 0,
    };

    let outcome = if options.auto_apply {
        apply_matches(api, limiter, &matches, options.threshold).await
    } else {
        ApplyOutcome::default()
    };
    stats.applied = outcome.applied.len();

    info!(
        products = stats.total_products,
        suggestions = stats.total_suggestions,
        applied = stats.applied,
        failures = outcome.failures.len(),
        dry_run = !options.auto_apply,
        "Collection assignment complete"
    );

    Ok(ReconcileReport {
        stats,
        matches,
        unresolved,
        applied: outcome.applied,
        already_assigned: outcome.already_assigned,
        failures: outcome.failures,
    })
}

fn pair_label(product_id: ProductId, collection_id: CollectionId) -> String {
    format!("product {product_id} -> collection {collection_id}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{MemoryStore, collection, product};

    fn suggestion(product_id: u64, titles: &[&str], scores: &[f64]) -> Suggestion {
        Suggestion {
            product_id: ProductId::new(product_id),
            collection_titles: titles.iter().map(ToString::to_string).collect(),
            scores: scores.to_vec(),
            reasoning: Vec::new(),
        }
    }

    #[test]
    fn test_suggestion_deserializes_classifier_payload() {
        let s: Suggestion = serde_json::from_value(json!({
            "productId": 12,
            "collections": ["Paravents", "Bois"],
            "confidenceScores": [0.9],
            "reasoning": ["matches material"]
        }))
        .unwrap();
        assert_eq!(s.product_id, ProductId::new(12));
        assert_eq!(s.collection_titles, vec!["Paravents", "Bois"]);
        assert_eq!(s.scores, vec![0.9]);
    }

    #[test]
    fn test_resolve_exact_titles_only() {
        let products = [product(1, "Paravent")];
        let collections = [collection(10, "Paravents"), collection(11, "Bois")];
        let suggestions = [suggestion(1, &["Paravents", "paravents", "Bois "], &[0.9, 0.9, 0.9])];

        let (matches, unresolved) = resolve_matches(&suggestions, &products, &collections, None);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].targets.len(), 1);
        assert_eq!(matches[0].targets[0].collection_id, CollectionId::new(10));
        assert_eq!(
            unresolved.iter().map(|u| u.title.as_str()).collect::<Vec<_>>(),
            vec!["paravents", "Bois "]
        );
    }

    #[test]
    fn test_resolve_defaults_and_merges() {
        let products = [product(1, "Paravent")];
        let collections = [collection(10, "A"), collection(11, "B")];
        let suggestions = [
            suggestion(1, &["A"], &[]),
            suggestion(1, &["A", "B"], &[0.5, 0.6]),
            suggestion(99, &["A"], &[1.0]),
        ];

        let (matches, _) = resolve_matches(&suggestions, &products, &collections, None);

        assert_eq!(matches.len(), 1);
        let targets = &matches[0].targets;
        assert_eq!(targets.len(), 2);
        assert!((targets[0].score - DEFAULT_SUGGESTION_SCORE).abs() < f64::EPSILON);
        assert_eq!(targets[0].reasoning, DEFAULT_REASONING);
        assert_eq!(targets[1].collection_id, CollectionId::new(11));
    }

    #[test]
    fn test_resolve_truncates_in_given_order() {
        let products = [product(1, "Paravent")];
        let collections = [collection(10, "A"), collection(11, "B"), collection(12, "C")];
        let suggestions = [suggestion(1, &["C", "A", "B"], &[0.9, 0.9, 0.9])];

        let (matches, _) = resolve_matches(&suggestions, &products, &collections, Some(2));

        let ids: Vec<_> = matches[0].targets.iter().map(|t| t.collection_id).collect();
        assert_eq!(ids, vec![CollectionId::new(12), CollectionId::new(10)]);
    }

    #[test]
    fn test_resolve_ignores_smart_collections() {
        let products = [product(1, "Paravent")];
        let mut smart = collection(20, "Nouveautés");
        smart.kind = CollectionKind::Smart;

        let (matches, unresolved) = resolve_matches(
            &[suggestion(1, &["Nouveautés"], &[0.9])],
            &products,
            &[smart],
            None,
        );

        assert!(matches[0].targets.is_empty());
        assert_eq!(unresolved.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_skips_existing_and_below_threshold() {
        let store = MemoryStore::new()
            .with_product(product(1, "Paravent"))
            .with_collection(collection(10, "A"))
            .with_collection(collection(11, "B"))
            .with_collection(collection(12, "C"))
            .with_collect(1, 10);

        let matches = [Match {
            product_id: ProductId::new(1),
            product_title: "Paravent".to_string(),
            targets: vec![
                target(10, 0.9),
                target(11, 0.7),
                target(12, 0.69),
            ],
        }];

        let outcome = apply_matches(&store, &RateLimiter::unpaced(), &matches, 0.7).await;

        assert_eq!(outcome.already_assigned, 1);
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied[0].collection_id, CollectionId::new(11));
        assert!(outcome.failures.is_empty());
        assert_eq!(store.add_calls(), 1);
        assert!(!store.has_collect(1, 12));
    }

    #[tokio::test]
    async fn test_apply_read_failure_skips_product() {
        let store = MemoryStore::new()
            .with_product(product(1, "Paravent"))
            .with_collection(collection(10, "A"));
        store.fail_collect_reads_for(1);

        let matches = [Match {
            product_id: ProductId::new(1),
            product_title: "Paravent".to_string(),
            targets: vec![target(10, 0.9)],
        }];

        let outcome = apply_matches(&store, &RateLimiter::unpaced(), &matches, 0.7).await;

        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_bad_threshold() {
        let store = MemoryStore::new();
        let options = ReconcileOptions {
            threshold: 1.5,
            ..ReconcileOptions::default()
        };
        let err = run(&store, &RateLimiter::unpaced(), &[], options)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_run_requires_catalog() {
        let store = MemoryStore::new().with_product(product(1, "Paravent"));
        let err = run(&store, &RateLimiter::unpaced(), &[], ReconcileOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::EmptyCatalog(_)));
    }

    #[tokio::test]
    async fn test_default_run_is_dry() {
        let store = MemoryStore::new()
            .with_product(product(1, "Paravent"))
            .with_collection(collection(10, "A"));

        let report = run(
            &store,
            &RateLimiter::unpaced(),
            &[suggestion(1, &["A"], &[0.95])],
            ReconcileOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.stats.total_suggestions, 1);
        assert_eq!(report.stats.high_confidence_suggestions, 1);
        assert_eq!(report.stats.applied, 0);
        assert_eq!(store.add_calls(), 0);
    }

    fn target(collection_id: u64, score: f64) -> MatchTarget {
        MatchTarget {
            collection_id: CollectionId::new(collection_id),
            collection_title: format!("Collection {collection_id}"),
            score,
            reasoning: DEFAULT_REASONING.to_string(),
        }
    }
}
