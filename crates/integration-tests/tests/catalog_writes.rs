//! REST writes and lookups of `StoreClient` against a recording server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header::LINK};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

use seo_sync::shopify::{ArticleInput, CollectionInput, Lookup, StoreClient};
use seo_sync::sync::{RateLimiter, pagination};
use seo_sync_core::{ArticleId, BlogId, CollectionId, CollectionKind, ImageId, ProductId};
use seo_sync_integration_tests::{RequestLog, spawn_admin_api};

async fn admin_api(
    State(log): State<RequestLog>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = log.record(&method, &uri, &body);

    match (method, request.path.as_str()) {
        (Method::GET, "/custom_collections.json") => {
            Json(json!({"custom_collections": []})).into_response()
        }
        (Method::GET, "/smart_collections.json") => {
            if request.query.contains("handle=nouveautes") {
                Json(json!({"smart_collections": [
                    {"id": 20, "title": "Nouveautés", "handle": "nouveautes"}
                ]}))
                .into_response()
            } else {
                Json(json!({"smart_collections": []})).into_response()
            }
        }
        (Method::POST, "/custom_collections.json") => Json(json!({"custom_collection": {
            "id": 11, "title": request.body["custom_collection"]["title"], "handle": "bois"
        }}))
        .into_response(),
        (Method::PUT, "/custom_collections/10.json") => Json(json!({"custom_collection": {
            "id": 10, "title": request.body["custom_collection"]["title"], "handle": "paravents"
        }}))
        .into_response(),
        (Method::GET, "/collections/10/products.json") => {
            if request.query.contains("page_info=p2") {
                Json(json!({"products": [{"id": 3, "title": "Lampe"}]})).into_response()
            } else {
                let link = r#"<https://shop.myshopify.com/admin/api/2025-01/collections/10/products.json?limit=250&page_info=p2>; rel="next""#;
                (
                    [(LINK, link)],
                    Json(json!({"products": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]})),
                )
                    .into_response()
            }
        }
        (Method::PUT, "/products/7.json") => {
            Json(json!({"product": {"id": 7, "title": "Paravent Noir", "handle": "paravent-noir"}}))
                .into_response()
        }
        (Method::PUT, "/products/7/images/3.json") => {
            Json(json!({"image": {"id": 3, "position": request.body["image"]["position"]}}))
                .into_response()
        }
        (Method::GET, "/blogs.json") => Json(json!({"blogs": [
            {"id": 5, "title": "Journal", "handle": "journal"}
        ]}))
        .into_response(),
        (Method::PUT, "/blogs/5/articles/8.json") => Json(json!({"article": {
            "id": 8, "blog_id": 5, "title": request.body["article"]["title"]
        }}))
        .into_response(),
        (
            Method::DELETE,
            "/products/7.json" | "/products/7/images/3.json" | "/blogs/5/articles/8.json",
        ) => Json(json!({})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve() -> (StoreClient, RequestLog) {
    let log = RequestLog::default();
    let router = Router::new().fallback(admin_api).with_state(log.clone());
    let store = spawn_admin_api(router).await;
    let http = StoreClient::http_client(Duration::from_secs(5)).unwrap();
    (StoreClient::new(http, &store), log)
}

#[tokio::test]
async fn test_collection_lookup_falls_back_to_smart() {
    let (client, log) = serve().await;

    match client.get_collection_by_handle("nouveautes").await {
        Lookup::Found(collection) => {
            assert_eq!(collection.id, CollectionId::new(20));
            assert_eq!(collection.kind, CollectionKind::Smart);
        }
        other => panic!("unexpected lookup: {other:?}"),
    }
    assert!(matches!(
        client.get_collection_by_handle("absente").await,
        Lookup::NotFound
    ));

    let custom = log.matching(&Method::GET, "/custom_collections.json");
    assert_eq!(custom.len(), 2);
    assert!(custom[0].query.contains("limit=1"));
}

#[tokio::test]
async fn test_collection_products_follow_cursor() {
    let (client, log) = serve().await;

    let products =
        pagination::all_collection_products(&client, &RateLimiter::unpaced(), CollectionId::new(10))
            .await;

    let ids: Vec<u64> = products.iter().map(|p| p.id.as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
        log.matching(&Method::GET, "/collections/10/products.json").len(),
        2
    );
}

#[tokio::test]
async fn test_collection_create_and_update() {
    let (client, log) = serve().await;
    let input = CollectionInput {
        title: Some("Bois".to_string()),
        ..CollectionInput::default()
    };

    let created = client.create_collection(&input).await.unwrap();
    assert_eq!(created.id, CollectionId::new(11));

    let input = CollectionInput {
        title: Some("Paravents & cloisons".to_string()),
        ..CollectionInput::default()
    };
    let updated = client
        .update_collection(CollectionId::new(10), &input)
        .await
        .unwrap();
    assert_eq!(updated.title, "Paravents & cloisons");

    let posted = log.bodies(&Method::POST, "/custom_collections.json");
    assert_eq!(posted[0], json!({"custom_collection": {"title": "Bois"}}));
}

#[tokio::test]
async fn test_handle_reset_sends_null() {
    let (client, log) = serve().await;

    client
        .update_product_handle(ProductId::new(7), None)
        .await
        .unwrap();

    let puts = log.bodies(&Method::PUT, "/products/7.json");
    assert_eq!(puts[0], json!({"product": {"id": 7, "handle": null}}));
}

#[tokio::test]
async fn test_image_position_and_deletes() {
    let (client, log) = serve().await;

    let image = client
        .update_product_image_position(ProductId::new(7), ImageId::new(3), 1)
        .await
        .unwrap();
    assert_eq!(image.position, Some(1));

    client
        .delete_product_image(ProductId::new(7), ImageId::new(3))
        .await
        .unwrap();
    client.delete_product(ProductId::new(7)).await.unwrap();

    assert_eq!(log.matching(&Method::DELETE, "/products/7/images/3.json").len(), 1);
    assert_eq!(log.matching(&Method::DELETE, "/products/7.json").len(), 1);
}

#[tokio::test]
async fn test_article_update_and_delete() {
    let (client, log) = serve().await;
    let blogs = client.blogs().await.unwrap();
    assert_eq!(blogs[0].id, BlogId::new(5));

    let input = ArticleInput {
        title: Some("Choisir un paravent".to_string()),
        ..ArticleInput::default()
    };

    let article = client
        .update_article(BlogId::new(5), ArticleId::new(8), &input)
        .await
        .unwrap();
    assert_eq!(article.title, "Choisir un paravent");

    client
        .delete_article(BlogId::new(5), ArticleId::new(8))
        .await
        .unwrap();
    assert_eq!(log.matching(&Method::DELETE, "/blogs/5/articles/8.json").len(), 1);

    let missing = client
        .delete_article(BlogId::new(5), ArticleId::new(9))
        .await
        .unwrap_err();
    assert_eq!(missing.status(), Some(404));
}
