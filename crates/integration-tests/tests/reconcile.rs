//! Collection assignment properties against the in-memory store.

#![allow(clippy::unwrap_used)]

use seo_sync::sync::RateLimiter;
use seo_sync::sync::reconcile::{self, ReconcileOptions, Suggestion};
use seo_sync_core::{CollectionId, ProductId};
use seo_sync_integration_tests::catalog;

fn suggestion(product_id: u64, titles: &[&str], scores: &[f64]) -> Suggestion {
    Suggestion {
        product_id: ProductId::new(product_id),
        collection_titles: titles.iter().map(ToString::to_string).collect(),
        scores: scores.to_vec(),
        reasoning: titles.iter().map(|t| format!("fits {t}")).collect(),
    }
}

fn options(threshold: f64) -> ReconcileOptions {
    ReconcileOptions {
        threshold,
        max_per_product: None,
        auto_apply: true,
    }
}

#[tokio::test]
async fn test_second_run_applies_nothing() {
    let store = catalog();
    let limiter = RateLimiter::unpaced();
    let suggestions = [
        suggestion(1, &["Paravents", "Bois"], &[0.9, 0.75]),
        suggestion(3, &["Luminaires"], &[0.95]),
    ];

    let first = reconcile::run(&store, &limiter, &suggestions, options(0.7))
        .await
        .unwrap();
    assert_eq!(first.stats.applied, 3);

    let second = reconcile::run(&store, &limiter, &suggestions, options(0.7))
        .await
        .unwrap();
    assert_eq!(second.stats.applied, 0);
    assert!(second.applied.is_empty());
    assert_eq!(second.already_assigned, 3);
    assert_eq!(store.add_calls(), 3);
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let store = catalog();
    let suggestions = [
        suggestion(1, &["Paravents"], &[0.7]),
        suggestion(2, &["Paravents"], &[0.69]),
    ];

    let report = reconcile::run(&store, &RateLimiter::unpaced(), &suggestions, options(0.7))
        .await
        .unwrap();

    assert_eq!(report.stats.applied, 1);
    assert_eq!(report.applied[0].product_id, ProductId::new(1));
    assert!(store.has_collect(1, 10));
    assert!(!store.has_collect(2, 10));
}

#[tokio::test]
async fn test_never_creates_duplicate_collects() {
    let store = catalog().with_collect(1, 10);
    let limiter = RateLimiter::unpaced();
    // Same pair suggested twice in one batch and again across runs.
    let suggestions = [
        suggestion(1, &["Paravents", "Paravents"], &[0.9, 0.9]),
        suggestion(1, &["Paravents", "Bois"], &[0.9, 0.9]),
        suggestion(2, &["Bois", "Bois"], &[0.8, 0.8]),
    ];

    for _ in 0..3 {
        reconcile::run(&store, &limiter, &suggestions, options(0.7))
            .await
            .unwrap();
    }

    for product_id in 1..=3 {
        for collection_id in 10..=12 {
            assert!(store.collects_between(product_id, collection_id) <= 1);
        }
    }
    assert!(store.has_collect(1, 11));
    assert!(store.has_collect(2, 11));
}

#[tokio::test]
async fn test_unknown_titles_are_dropped() {
    let store = catalog();
    let suggestions = [suggestion(1, &["Paravents Japonais", "paravents", "Bois"], &[0.99, 0.99, 0.9])];

    let report = reconcile::run(&store, &RateLimiter::unpaced(), &suggestions, options(0.7))
        .await
        .unwrap();

    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].collection_id, CollectionId::new(11));
    assert_eq!(report.unresolved.len(), 2);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_stats_count_suggestions() {
    let store = catalog();
    let suggestions = [
        suggestion(1, &["Paravents", "Bois"], &[0.9, 0.5]),
        suggestion(2, &["Bois"], &[]),
        suggestion(3, &["Inconnue"], &[0.9]),
    ];

    let report = reconcile::run(&store, &RateLimiter::unpaced(), &suggestions, options(0.7))
        .await
        .unwrap();

    assert_eq!(report.stats.total_products, 3);
    assert_eq!(report.stats.total_collections, 3);
    assert_eq!(report.stats.products_with_matches, 2);
    assert_eq!(report.stats.total_suggestions, 3);
    // 0.9 and the 0.8 default
    assert_eq!(report.stats.high_confidence_suggestions, 2);
    assert_eq!(report.stats.applied, 2);
}

#[tokio::test]
async fn test_max_per_product_keeps_first_targets() {
    let store = catalog();
    let suggestions = [suggestion(1, &["Luminaires", "Paravents", "Bois"], &[0.9, 0.9, 0.9])];
    let options = ReconcileOptions {
        max_per_product: Some(1),
        ..options(0.7)
    };

    let report = reconcile::run(&store, &RateLimiter::unpaced(), &suggestions, options)
        .await
        .unwrap();

    assert_eq!(report.stats.applied, 1);
    assert!(store.has_collect(1, 12));
}

#[tokio::test(start_paused = true)]
async fn test_throttled_add_is_retried_once() {
    let store = catalog();
    store.fail_next_adds(1, 429);

    let report = reconcile::run(
        &store,
        &RateLimiter::default(),
        &[suggestion(1, &["Paravents"], &[0.9])],
        options(0.7),
    )
    .await
    .unwrap();

    assert_eq!(report.stats.applied, 1);
    assert_eq!(store.add_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_throttling_fails_item_not_batch() {
    let store = catalog();
    store.fail_next_adds(2, 429);

    let report = reconcile::run(
        &store,
        &RateLimiter::default(),
        &[
            suggestion(1, &["Paravents"], &[0.9]),
            suggestion(2, &["Bois"], &[0.9]),
        ],
        options(0.7),
    )
    .await
    .unwrap();

    // Two attempts for the first pair, then the second pair succeeds.
    assert_eq!(store.add_calls(), 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].product_id, ProductId::new(2));
}

#[tokio::test]
async fn test_collects_read_once_per_product() {
    let store = catalog();
    let suggestions = [suggestion(1, &["Paravents", "Bois", "Luminaires"], &[0.9, 0.9, 0.9])];

    reconcile::run(&store, &RateLimiter::unpaced(), &suggestions, options(0.7))
        .await
        .unwrap();

    assert_eq!(store.collect_read_calls(), 1);
    assert_eq!(store.add_calls(), 3);
}
