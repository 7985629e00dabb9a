//! Core types for the SEO sync service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod publish;
pub mod status;
pub mod store;

pub use id::*;
pub use publish::{
    ArticlePublishFields, CollectionPublishFields, ProductPublishFields, PublishMode,
    PublishOptions,
};
pub use status::{CollectionKind, ProductStatus};
pub use store::Store;
