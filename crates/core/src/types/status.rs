//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Product lifecycle status.
///
/// Maps to the REST Admin API's lowercase `status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

/// Collection variant.
///
/// Custom collections are curated by hand through collects; smart
/// collections are rule-based and cannot be assigned products directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Custom,
    Smart,
}

impl CollectionKind {
    /// REST resource path segment (e.g. `custom_collections`).
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Custom => "custom_collections",
            Self::Smart => "smart_collections",
        }
    }
}
