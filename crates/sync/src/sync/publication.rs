//! Storefront channel publication, immediate or scheduled.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use seo_sync_core::Publishable;

use crate::shopify::{Publication, StoreApi, StoreError};

/// Names the storefront channel is known by, per shop locale.
pub const STOREFRONT_CHANNEL_NAMES: [&str; 2] = ["Online Store", "Boutique en ligne"];

/// Pick the storefront channel by exact name.
#[must_use]
pub fn storefront_channel(publications: &[Publication]) -> Option<&Publication> {
    publications
        .iter()
        .find(|p| STOREFRONT_CHANNEL_NAMES.contains(&p.name.as_str()))
}

/// How a publish request was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "camelCase")]
pub enum PublishOutcome {
    Immediate,
    Scheduled(DateTime<Utc>),
}

/// Publish `target` on the storefront channel at `at`, or now.
///
/// An instant at or before `now` publishes immediately. Application errors
/// in the mutation response fail the call; nothing is retried here because
/// a publish is not safe to repeat blindly.
///
/// # Errors
///
/// Returns [`StoreError::ChannelNotFound`] without sending any mutation
/// when the store has no storefront channel, or the error of the channel
/// query or publish mutation.
#[instrument(skip(api), fields(target = %target.to_gid()))]
pub async fn publish_to_storefront<A: StoreApi>(
    api: &A,
    target: Publishable,
    at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<PublishOutcome, StoreError> {
    let publications = api.publications().await?;
    let channel = storefront_channel(&publications)
        .ok_or_else(|| StoreError::ChannelNotFound(STOREFRONT_CHANNEL_NAMES.join(" / ")))?;

    let outcome = match at {
        Some(at) if at > now => PublishOutcome::Scheduled(at),
        _ => PublishOutcome::Immediate,
    };

    let publish_date = match outcome {
        PublishOutcome::Scheduled(at) => Some(at),
        PublishOutcome::Immediate => None,
    };
    api.publish(target, &channel.id, publish_date).await?;

    info!(channel = %channel.name, ?outcome, "Published to storefront");
    Ok(outcome)
}
