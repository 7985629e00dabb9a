//! Shopify sync API handlers.
//!
//! Every response is `{ "success": true, ...data }` on success; failures go
//! through [`AppError`] as `{ "success": false, "message": ... }`.

use axum::{Json, Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seo_sync_core::{ArticleId, BlogId, CollectionId, ImageId, ProductId, PublishOptions, Store};

use crate::error::AppError;
use crate::shopify::{
    Article, ArticleInput, Collection, CollectionInput, Product, ProductInput, Shop,
};
use crate::state::AppState;
use crate::sync::{
    catalog::{self, CollectionListing, SingleAssignment},
    handles::{self, HandleAction, HandleTarget, HandleUpdateSummary},
    publication::PublishOutcome,
    publishing::{self, PublishedProduct},
    reconcile::{self, ReconcileOptions, ReconcileReport, Suggestion},
    removal::{self, RemovalSummary},
};

/// Build the Shopify API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/shopify/test-connection", post(test_connection))
        .route("/api/shopify/sync-products", post(sync_products))
        .route("/api/shopify/sync-collections", post(sync_collections))
        .route("/api/shopify/unassigned-products", post(unassigned_products))
        .route("/api/shopify/apply-suggestion", post(apply_suggestion))
        .route("/api/shopify/ai-assign-collections", post(ai_assign_collections))
        .route("/api/shopify/remove-all-collections", post(remove_all_collections))
        .route("/api/shopify/publish-product", post(publish_product))
        .route("/api/shopify/publish-collection", post(publish_collection))
        .route("/api/shopify/publish-article", post(publish_article))
        .route(
            "/api/shopify/schedule-product-visibility",
            post(schedule_product_visibility),
        )
        .route("/api/shopify/update-product-handles", post(update_product_handles))
        .route("/api/shopify/update-product-title", post(update_product_title))
        .route("/api/shopify/update-product-images", post(update_product_images))
        .route("/api/shopify/delete-product-image", post(delete_product_image))
        .route("/api/shopify/delete-product", post(delete_product))
        .route("/api/shopify/create-collection", post(create_collection))
        .route(
            "/api/shopify/update-collection-description",
            post(update_collection_description),
        )
        .route("/api/shopify/update-article", post(update_article))
        .route("/api/shopify/delete-article", post(delete_article))
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        success: true,
        data,
    }))
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StoreRequest {
    pub store: Store,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySuggestionRequest {
    pub store: Store,
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    #[serde(alias = "collection_id")]
    pub collection_id: CollectionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCollectionsRequest {
    pub store: Store,
    pub suggestions: Vec<Suggestion>,
    #[serde(flatten)]
    pub options: ReconcileOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishProductRequest {
    pub store: Store,
    pub product: ProductInput,
    #[serde(flatten)]
    pub options: PublishOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishCollectionRequest {
    pub store: Store,
    pub collection: CollectionInput,
    #[serde(flatten)]
    pub options: PublishOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishArticleRequest {
    pub store: Store,
    /// Defaults to the store's first blog.
    #[serde(default)]
    pub blog_id: Option<BlogId>,
    pub article: ArticleInput,
    #[serde(flatten)]
    pub options: PublishOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleVisibilityRequest {
    pub store: Store,
    pub product_id: ProductId,
    /// Absent publishes immediately.
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHandlesRequest {
    pub store: Store,
    pub products: Vec<HandleTarget>,
    pub action: HandleAction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTitleRequest {
    pub store: Store,
    pub product_id: ProductId,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRef {
    pub id: ImageId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImagesRequest {
    pub store: Store,
    pub product_id: ProductId,
    /// In the new display order.
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageRequest {
    pub store: Store,
    pub product_id: ProductId,
    pub image_id: ImageId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub store: Store,
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub store: Store,
    pub collection: CollectionInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDescriptionRequest {
    pub store: Store,
    pub collection_id: CollectionId,
    pub body_html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    pub store: Store,
    pub blog_id: BlogId,
    pub article_id: ArticleId,
    pub article: ArticleInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteArticleRequest {
    pub store: Store,
    pub blog_id: BlogId,
    pub article_id: ArticleId,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ShopData {
    pub shop: Shop,
}

#[derive(Debug, Serialize)]
pub struct ProductsData {
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductData {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CollectionsData {
    pub count: usize,
    pub collections: Vec<CollectionListing>,
}

#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CollectionData {
    pub collection: Collection,
}

#[derive(Debug, Serialize)]
pub struct ArticleData {
    pub article: Article,
}

#[derive(Debug, Serialize)]
pub struct VisibilityData {
    pub publication: PublishOutcome,
}

// =============================================================================
// Handlers
// =============================================================================

/// Verify the store credentials by fetching the shop record.
async fn test_connection(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<ShopData> {
    let client = state.client_for(&req.store)?;
    let shop = client.shop().await?;
    tracing::info!(store = %client.shop_domain(), shop = %shop.name, "Connection verified");
    ok(ShopData { shop })
}

async fn sync_products(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<ProductsData> {
    let client = state.client_for(&req.store)?;
    let products = catalog::fetch_all_products(&client, state.limiter()).await;
    ok(ProductsData {
        count: products.len(),
        products,
    })
}

async fn sync_collections(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<CollectionsData> {
    let client = state.client_for(&req.store)?;
    let collections = catalog::fetch_collections_with_products(&client, state.limiter()).await;
    ok(CollectionsData {
        count: collections.len(),
        collections,
    })
}

async fn unassigned_products(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<ProductsData> {
    let client = state.client_for(&req.store)?;
    let products = removal::find_unassigned_products(&client, state.limiter()).await;
    ok(ProductsData {
        count: products.len(),
        products,
    })
}

async fn apply_suggestion(
    State(state): State<AppState>,
    Json(req): Json<ApplySuggestionRequest>,
) -> ApiResult<SingleAssignment> {
    let client = state.client_for(&req.store)?;
    let result =
        catalog::apply_single_suggestion(&client, state.limiter(), req.product_id, req.collection_id)
            .await?;
    ok(result)
}

async fn ai_assign_collections(
    State(state): State<AppState>,
    Json(req): Json<AssignCollectionsRequest>,
) -> ApiResult<ReconcileReport> {
    let client = state.client_for(&req.store)?;
    let report = reconcile::run(&client, state.limiter(), &req.suggestions, req.options).await?;
    ok(report)
}

async fn remove_all_collections(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<RemovalSummary> {
    let client = state.client_for(&req.store)?;
    let summary = removal::remove_all_collections(&client, state.limiter()).await;
    ok(summary)
}

async fn publish_product(
    State(state): State<AppState>,
    Json(req): Json<PublishProductRequest>,
) -> ApiResult<PublishedProduct> {
    let client = state.client_for(&req.store)?;
    let published = publishing::publish_product(&client, req.product, req.options, Utc::now()).await?;
    ok(published)
}

async fn publish_collection(
    State(state): State<AppState>,
    Json(req): Json<PublishCollectionRequest>,
) -> ApiResult<CollectionData> {
    let client = state.client_for(&req.store)?;
    let collection =
        publishing::publish_collection(&client, req.collection, req.options, Utc::now()).await?;
    ok(CollectionData { collection })
}

async fn publish_article(
    State(state): State<AppState>,
    Json(req): Json<PublishArticleRequest>,
) -> ApiResult<ArticleData> {
    let client = state.client_for(&req.store)?;

    let blog_id = match req.blog_id {
        Some(id) => id,
        None => client
            .blogs()
            .await?
            .first()
            .map(|blog| blog.id)
            .ok_or_else(|| AppError::BadRequest("Store has no blog".to_string()))?,
    };

    let article =
        publishing::publish_article(&client, blog_id, req.article, req.options, Utc::now()).await?;
    ok(ArticleData { article })
}

async fn schedule_product_visibility(
    State(state): State<AppState>,
    Json(req): Json<ScheduleVisibilityRequest>,
) -> ApiResult<VisibilityData> {
    let client = state.client_for(&req.store)?;
    let publication = publishing::schedule_product_visibility(
        &client,
        req.product_id,
        req.scheduled_date,
        Utc::now(),
    )
    .await?;
    ok(VisibilityData { publication })
}

async fn update_product_handles(
    State(state): State<AppState>,
    Json(req): Json<UpdateHandlesRequest>,
) -> ApiResult<HandleUpdateSummary> {
    let client = state.client_for(&req.store)?;
    let summary =
        handles::update_handles(&client, state.limiter(), &req.products, req.action).await;
    ok(summary)
}

async fn update_product_title(
    State(state): State<AppState>,
    Json(req): Json<UpdateTitleRequest>,
) -> ApiResult<ProductData> {
    let client = state.client_for(&req.store)?;
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Product title is required".to_string()));
    }

    let input = ProductInput {
        title: Some(title.to_string()),
        ..ProductInput::default()
    };
    let product = client.update_product(req.product_id, &input).await?;
    ok(ProductData { product })
}

/// Give each image its 1-based position in the submitted order.
async fn update_product_images(
    State(state): State<AppState>,
    Json(req): Json<ReorderImagesRequest>,
) -> ApiResult<MessageData> {
    let client = state.client_for(&req.store)?;

    for (position, image) in (1u32..).zip(&req.images) {
        state
            .limiter()
            .call(|| client.update_product_image_position(req.product_id, image.id, position))
            .await?;
    }

    tracing::info!(product_id = %req.product_id, count = req.images.len(), "Images reordered");
    ok(MessageData {
        message: format!("{} images reordered", req.images.len()),
    })
}

async fn delete_product_image(
    State(state): State<AppState>,
    Json(req): Json<DeleteImageRequest>,
) -> ApiResult<MessageData> {
    let client = state.client_for(&req.store)?;
    client.delete_product_image(req.product_id, req.image_id).await?;
    ok(MessageData {
        message: format!("Image {} deleted", req.image_id),
    })
}

async fn delete_product(
    State(state): State<AppState>,
    Json(req): Json<DeleteProductRequest>,
) -> ApiResult<MessageData> {
    let client = state.client_for(&req.store)?;
    client.delete_product(req.product_id).await?;
    ok(MessageData {
        message: format!("Product {} deleted", req.product_id),
    })
}

async fn create_collection(
    State(state): State<AppState>,
    Json(req): Json<CreateCollectionRequest>,
) -> ApiResult<CollectionData> {
    let client = state.client_for(&req.store)?;
    let collection = publishing::create_collection(&client, req.collection).await?;
    ok(CollectionData { collection })
}

async fn update_collection_description(
    State(state): State<AppState>,
    Json(req): Json<CollectionDescriptionRequest>,
) -> ApiResult<CollectionData> {
    let client = state.client_for(&req.store)?;
    if req.body_html.trim().is_empty() {
        return Err(AppError::BadRequest("bodyHtml is required".to_string()));
    }

    let input = CollectionInput {
        body_html: Some(req.body_html),
        ..CollectionInput::default()
    };
    let collection = client.update_collection(req.collection_id, &input).await?;
    ok(CollectionData { collection })
}

async fn update_article(
    State(state): State<AppState>,
    Json(req): Json<UpdateArticleRequest>,
) -> ApiResult<ArticleData> {
    let client = state.client_for(&req.store)?;
    let article = client
        .update_article(req.blog_id, req.article_id, &req.article)
        .await?;
    ok(ArticleData { article })
}

async fn delete_article(
    State(state): State<AppState>,
    Json(req): Json<DeleteArticleRequest>,
) -> ApiResult<MessageData> {
    let client = state.client_for(&req.store)?;
    client.delete_article(req.blog_id, req.article_id).await?;
    ok(MessageData {
        message: format!("Article {} deleted", req.article_id),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use seo_sync_core::PublishMode;

    #[test]
    fn test_api_response_flattens_data() {
        let body = serde_json::to_value(ApiResponse {
            success: true,
            data: ProductsData {
                count: 0,
                products: vec![],
            },
        })
        .unwrap();
        assert_eq!(body, json!({"success": true, "count": 0, "products": []}));
    }

    #[test]
    fn test_assign_request_defaults() {
        let req: AssignCollectionsRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "suggestions": []
        }))
        .unwrap();
        assert!((req.options.threshold - 0.7).abs() < f64::EPSILON);
        assert!(!req.options.auto_apply);
        assert_eq!(req.options.max_per_product, None);
    }

    #[test]
    fn test_apply_suggestion_accepts_string_ids() {
        let req: ApplySuggestionRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "product_id": "632910392",
            "collection_id": "gid://shopify/Collection/841564295"
        }))
        .unwrap();
        assert_eq!(req.product_id, ProductId::new(632_910_392));
        assert_eq!(req.collection_id, CollectionId::new(841_564_295));
    }

    #[test]
    fn test_assign_request_string_product_ids() {
        let req: AssignCollectionsRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "suggestions": [{"productId": "12", "collections": ["Paravents"]}]
        }))
        .unwrap();
        assert_eq!(req.suggestions[0].product_id, ProductId::new(12));
    }

    #[test]
    fn test_update_handles_request() {
        let req: UpdateHandlesRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "products": [{"id": "7", "title": "Paravent", "handle": "paravent-noir"}, {"id": 8}],
            "action": "custom"
        }))
        .unwrap();
        assert_eq!(req.action, HandleAction::Custom);
        assert_eq!(req.products[0].id, ProductId::new(7));
        assert_eq!(req.products[1].handle, None);
    }

    #[test]
    fn test_assign_request_options() {
        let req: AssignCollectionsRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "suggestions": [{"productId": 1, "collectionTitles": ["A"]}],
            "threshold": 0.85,
            "maxSuggestionsPerProduct": 2,
            "autoApply": false
        }))
        .unwrap();
        assert!((req.options.threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(req.options.max_per_product, Some(2));
        assert!(!req.options.auto_apply);
        assert_eq!(req.suggestions.len(), 1);
    }

    #[test]
    fn test_publish_product_request() {
        let req: PublishProductRequest = serde_json::from_value(json!({
            "store": {"shopDomain": "shop.myshopify.com", "accessToken": "shpat_x"},
            "product": {"title": "Paravent", "handle": "paravent"},
            "publishMode": "scheduled",
            "scheduledDate": "2030-01-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.options.publish_mode, PublishMode::Scheduled);
        assert!(req.options.scheduled_date.is_some());
        assert_eq!(req.product.handle.as_deref(), Some("paravent"));
    }
}
