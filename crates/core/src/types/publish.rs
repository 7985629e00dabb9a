//! Publish modes and the entity fields they govern.
//!
//! A publish mode decides the optional publication fields written when a
//! product, collection or article is created or updated. Sales-channel
//! visibility is handled separately by the publication scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ProductStatus;

/// How an entity should be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Saved but not published.
    #[default]
    Draft,
    /// Published immediately.
    Active,
    /// Published at a caller-supplied instant.
    Scheduled,
}

/// Publish mode plus the optional scheduled instant, as supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PublishOptions {
    #[serde(default)]
    pub publish_mode: PublishMode,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Publication fields for a product payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductPublishFields {
    pub status: ProductStatus,
    pub published_at: Option<DateTime<Utc>>,
}

/// Publication fields for a collection payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionPublishFields {
    pub published_at: Option<DateTime<Utc>>,
}

/// Publication fields for an article payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArticlePublishFields {
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl PublishOptions {
    #[must_use]
    pub const fn new(publish_mode: PublishMode, scheduled_date: Option<DateTime<Utc>>) -> Self {
        Self {
            publish_mode,
            scheduled_date,
        }
    }

    /// The mode actually applied: `scheduled` without a date degrades to `active`.
    #[must_use]
    pub const fn effective_mode(&self) -> PublishMode {
        match (self.publish_mode, self.scheduled_date) {
            (PublishMode::Scheduled, None) => PublishMode::Active,
            (mode, _) => mode,
        }
    }

    /// The instant to hand to the publication scheduler, if scheduled.
    #[must_use]
    pub const fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        match self.publish_mode {
            PublishMode::Scheduled => self.scheduled_date,
            PublishMode::Draft | PublishMode::Active => None,
        }
    }

    /// Product fields. A scheduled product is created active but unpublished;
    /// its storefront publication is scheduled afterwards.
    #[must_use]
    pub const fn product_fields(&self, now: DateTime<Utc>) -> ProductPublishFields {
        match self.effective_mode() {
            PublishMode::Draft => ProductPublishFields {
                status: ProductStatus::Draft,
                published_at: None,
            },
            PublishMode::Active => ProductPublishFields {
                status: ProductStatus::Active,
                published_at: Some(now),
            },
            PublishMode::Scheduled => ProductPublishFields {
                status: ProductStatus::Active,
                published_at: None,
            },
        }
    }

    #[must_use]
    pub const fn collection_fields(&self, now: DateTime<Utc>) -> CollectionPublishFields {
        let published_at = match self.effective_mode() {
            PublishMode::Draft => None,
            PublishMode::Active => Some(now),
            PublishMode::Scheduled => self.scheduled_date,
        };
        CollectionPublishFields { published_at }
    }

    /// Article fields. A scheduled article stays hidden until `published_at`.
    #[must_use]
    pub const fn article_fields(&self, now: DateTime<Utc>) -> ArticlePublishFields {
        match self.effective_mode() {
            PublishMode::Draft => ArticlePublishFields {
                published: false,
                published_at: None,
            },
            PublishMode::Active => ArticlePublishFields {
                published: true,
                published_at: Some(now),
            },
            PublishMode::Scheduled => ArticlePublishFields {
                published: false,
                published_at: self.scheduled_date,
            },
        }
    }
}
