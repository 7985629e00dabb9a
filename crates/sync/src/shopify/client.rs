//! REST + GraphQL client for one store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use graphql_client::GraphQLQuery;
use reqwest::header::{CONTENT_TYPE, HeaderValue, LINK};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use seo_sync_core::{
    ArticleId, BlogId, CollectId, CollectionId, CollectionKind, ImageId, ProductId, Publishable,
    Store,
};

use super::{
    GraphQLError, StoreError, UserError,
    link::next_page_info,
    queries::{self, GetPublications, PublishablePublish},
    types::{
        Article, ArticleInput, Blog, Collect, CollectInput, Collection, CollectionInput, Page,
        Product, ProductImage, ProductInput, Publication, Shop,
    },
};

/// Largest page size accepted by REST list endpoints.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Publications requested per page; the list is walked to the end.
const PUBLICATIONS_PAGE_SIZE: i64 = 50;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Outcome of a lookup that callers use only to choose create-vs-update.
///
/// A failed lookup is kept distinct from a clean "not found" so it can be
/// logged, while [`Lookup::into_option`] still degrades it to `None`.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable(StoreError),
}

impl<T> Lookup<T> {
    /// Collapse to an `Option`, treating an unavailable lookup as not found.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }
}

/// Shopify Admin API client bound to one store's credentials.
///
/// Cheap to clone; holds no state besides the immutable credentials and a
/// shared connection pool.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    http: reqwest::Client,
    shop_domain: String,
    api_url: String,
    graphql_url: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

// Response envelopes. Collection endpoints differ only by key, so aliases
// let one struct serve both custom and smart collections.

#[derive(Deserialize)]
struct ShopEnvelope {
    shop: Shop,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct ProductEnvelope {
    product: Product,
}

#[derive(Deserialize)]
struct ImageEnvelope {
    image: ProductImage,
}

#[derive(Deserialize)]
struct CollectionsEnvelope {
    #[serde(default, alias = "custom_collections", alias = "smart_collections")]
    collections: Vec<Collection>,
}

#[derive(Deserialize)]
struct CollectionEnvelope {
    #[serde(alias = "custom_collection", alias = "smart_collection")]
    collection: Collection,
}

#[derive(Deserialize)]
struct CollectsEnvelope {
    #[serde(default)]
    collects: Vec<Collect>,
}

#[derive(Deserialize)]
struct CollectEnvelope {
    collect: Collect,
}

#[derive(Deserialize)]
struct BlogsEnvelope {
    #[serde(default)]
    blogs: Vec<Blog>,
}

#[derive(Deserialize)]
struct ArticleEnvelope {
    article: Article,
}

// Request bodies.

#[derive(Serialize)]
struct ProductBody<'a, T: Serialize> {
    product: &'a T,
}

#[derive(Serialize)]
struct HandleUpdate<'a> {
    id: ProductId,
    handle: Option<&'a str>,
}

#[derive(Serialize)]
struct ImagePositionBody {
    image: ImagePosition,
}

#[derive(Serialize)]
struct ImagePosition {
    id: ImageId,
    position: u32,
}

#[derive(Serialize)]
struct CustomCollectionBody<'a> {
    custom_collection: &'a CollectionInput,
}

#[derive(Serialize)]
struct CollectBody {
    collect: CollectInput,
}

#[derive(Serialize)]
struct ArticleBody<'a> {
    article: &'a ArticleInput,
}

impl StoreClient {
    /// Build the shared HTTP client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn http_client(timeout: Duration) -> Result<reqwest::Client, StoreError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?)
    }

    /// Create a client for one store.
    ///
    /// Credentials are always passed explicitly; nothing is read from the
    /// environment.
    #[must_use]
    pub fn new(http: reqwest::Client, store: &Store) -> Self {
        Self {
            inner: Arc::new(StoreClientInner {
                http,
                shop_domain: store.shop_domain.clone(),
                api_url: store.admin_api_url(),
                graphql_url: store.graphql_url(),
                access_token: store.access_token.clone(),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn shop_domain(&self) -> &str {
        &self.inner.shop_domain
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn token(&self) -> Result<HeaderValue, StoreError> {
        let mut value = HeaderValue::from_str(self.inner.access_token.expose_secret())
            .map_err(|_| StoreError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.api_url))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issue a REST call and fail with the status and raw body on non-success.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let response = request.header(ACCESS_TOKEN_HEADER, self.token()?).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Issue a resource call and return the parsed payload.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let url = self.endpoint(path, query)?;
        let response = self.send(self.inner.http.get(url)).await?;
        Self::parse(response).await
    }

    /// Issue a list call and return the payload with the next-page cursor.
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, Option<String>), StoreError> {
        let url = self.endpoint(path, query)?;
        let response = self.send(self.inner.http.get(url)).await?;
        let next_cursor = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_info);
        let payload = Self::parse(response).await?;
        Ok((payload, next_cursor))
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.endpoint(path, &[])?;
        let response = self.send(self.inner.http.post(url).json(body)).await?;
        Self::parse(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.endpoint(path, &[])?;
        let response = self.send(self.inner.http.put(url).json(body)).await?;
        Self::parse(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = self.endpoint(path, &[])?;
        self.send(self.inner.http.delete(url)).await?;
        Ok(())
    }

    /// Query parameters for one page: Shopify rejects filters alongside
    /// `page_info`, so they are only sent on the first page.
    fn page_query<'a>(
        cursor: Option<&str>,
        filters: &[(&'a str, String)],
    ) -> Vec<(&'a str, String)> {
        let mut query = vec![("limit", MAX_PAGE_SIZE.to_string())];
        match cursor {
            Some(cursor) => query.push(("page_info", cursor.to_string())),
            None => query.extend(filters.iter().cloned()),
        }
        query
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    ///
    /// A non-success status is a transport failure; an `errors` array inside
    /// a success response is reported separately as [`StoreError::GraphQL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, returns a non-success status,
    /// or carries GraphQL errors.
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, StoreError>
    where
        Q::Variables: Send + Sync,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .http
            .post(&self.inner.graphql_url)
            .header(ACCESS_TOKEN_HEADER, self.token()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::QueryTransport {
                status: status.as_u16(),
                body: text,
            });
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = serde_json::from_str(&text)?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(StoreError::GraphQL(errors));
        }

        graphql_response.data.ok_or_else(|| {
            StoreError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Shop
    // =========================================================================

    /// Fetch the shop record; doubles as a credentials check.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn shop(&self) -> Result<Shop, StoreError> {
        let envelope: ShopEnvelope = self.get("/shop.json", &[]).await?;
        Ok(envelope.shop)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn products_page(&self, cursor: Option<&str>) -> Result<Page<Product>, StoreError> {
        let query = Self::page_query(cursor, &[]);
        let (envelope, next_cursor): (ProductsEnvelope, _) =
            self.get_page("/products.json", &query).await?;
        Ok(Page {
            items: envelope.products,
            next_cursor,
        })
    }

    /// Look up a product by handle.
    ///
    /// Used only to decide between create and update, so a failed lookup is
    /// reported as [`Lookup::Unavailable`] instead of an error.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Lookup<Product> {
        let query = [("handle", handle.to_string()), ("limit", "1".to_string())];
        match self.get::<ProductsEnvelope>("/products.json", &query).await {
            Ok(envelope) => envelope
                .products
                .into_iter()
                .next()
                .map_or(Lookup::NotFound, Lookup::Found),
            Err(e) => {
                tracing::warn!(error = %e, "Product handle lookup failed, treating as not found");
                Lookup::Unavailable(e)
            }
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, StoreError> {
        let envelope: ProductEnvelope = self
            .post("/products.json", &ProductBody { product: input })
            .await?;
        Ok(envelope.product)
    }

    /// Update a product. Only fields set on `input` are changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain, product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, StoreError> {
        let envelope: ProductEnvelope = self
            .put(&format!("/products/{id}.json"), &ProductBody { product: input })
            .await?;
        Ok(envelope.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.delete(&format!("/products/{id}.json")).await
    }

    /// Set a product's handle; `None` makes Shopify regenerate it from the title.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the handle is taken.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, product_id = %id))]
    pub async fn update_product_handle(
        &self,
        id: ProductId,
        handle: Option<&str>,
    ) -> Result<Product, StoreError> {
        let body = ProductBody {
            product: &HandleUpdate { id, handle },
        };
        let envelope: ProductEnvelope = self.put(&format!("/products/{id}.json"), &body).await?;
        Ok(envelope.product)
    }

    /// Move a product image to a new position.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, product_id = %product_id))]
    pub async fn update_product_image_position(
        &self,
        product_id: ProductId,
        image_id: ImageId,
        position: u32,
    ) -> Result<ProductImage, StoreError> {
        let body = ImagePositionBody {
            image: ImagePosition {
                id: image_id,
                position,
            },
        };
        let envelope: ImageEnvelope = self
            .put(&format!("/products/{product_id}/images/{image_id}.json"), &body)
            .await?;
        Ok(envelope.image)
    }

    /// Delete a product image.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, product_id = %product_id))]
    pub async fn delete_product_image(
        &self,
        product_id: ProductId,
        image_id: ImageId,
    ) -> Result<(), StoreError> {
        self.delete(&format!("/products/{product_id}/images/{image_id}.json"))
            .await
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Fetch one page of custom or smart collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn collections_page(
        &self,
        kind: CollectionKind,
        cursor: Option<&str>,
    ) -> Result<Page<Collection>, StoreError> {
        let query = Self::page_query(cursor, &[]);
        let path = format!("/{}.json", kind.resource());
        let (envelope, next_cursor): (CollectionsEnvelope, _) =
            self.get_page(&path, &query).await?;
        let items = envelope
            .collections
            .into_iter()
            .map(|c| Collection { kind, ..c })
            .collect();
        Ok(Page { items, next_cursor })
    }

    /// Look up a collection by handle, custom collections first.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn get_collection_by_handle(&self, handle: &str) -> Lookup<Collection> {
        let query = [("handle", handle.to_string()), ("limit", "1".to_string())];
        for kind in [CollectionKind::Custom, CollectionKind::Smart] {
            let path = format!("/{}.json", kind.resource());
            match self.get::<CollectionsEnvelope>(&path, &query).await {
                Ok(envelope) => {
                    if let Some(collection) = envelope.collections.into_iter().next() {
                        return Lookup::Found(Collection { kind, ..collection });
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Collection handle lookup failed, treating as not found");
                    return Lookup::Unavailable(e);
                }
            }
        }
        Lookup::NotFound
    }

    /// Create a custom collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain))]
    pub async fn create_collection(
        &self,
        input: &CollectionInput,
    ) -> Result<Collection, StoreError> {
        let envelope: CollectionEnvelope = self
            .post(
                "/custom_collections.json",
                &CustomCollectionBody {
                    custom_collection: input,
                },
            )
            .await?;
        Ok(envelope.collection)
    }

    /// Update a custom collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain, collection_id = %id))]
    pub async fn update_collection(
        &self,
        id: CollectionId,
        input: &CollectionInput,
    ) -> Result<Collection, StoreError> {
        let envelope: CollectionEnvelope = self
            .put(
                &format!("/custom_collections/{id}.json"),
                &CustomCollectionBody {
                    custom_collection: input,
                },
            )
            .await?;
        Ok(envelope.collection)
    }

    /// Fetch one page of the products in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, collection_id = %id))]
    pub async fn collection_products_page(
        &self,
        id: CollectionId,
        cursor: Option<&str>,
    ) -> Result<Page<Product>, StoreError> {
        let query = Self::page_query(cursor, &[]);
        let (envelope, next_cursor): (ProductsEnvelope, _) = self
            .get_page(&format!("/collections/{id}/products.json"), &query)
            .await?;
        Ok(Page {
            items: envelope.products,
            next_cursor,
        })
    }

    // =========================================================================
    // Collects
    // =========================================================================

    /// Fetch one page of a product's membership records.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, product_id = %product_id))]
    pub async fn product_collects_page(
        &self,
        product_id: ProductId,
        cursor: Option<&str>,
    ) -> Result<Page<Collect>, StoreError> {
        let query = Self::page_query(cursor, &[("product_id", product_id.to_string())]);
        let (envelope, next_cursor): (CollectsEnvelope, _) =
            self.get_page("/collects.json", &query).await?;
        Ok(Page {
            items: envelope.collects,
            next_cursor,
        })
    }

    /// Add a product to a custom collection by creating a collect.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails (429 included).
    #[instrument(
        skip(self),
        fields(store = %self.inner.shop_domain, product_id = %product_id, collection_id = %collection_id)
    )]
    pub async fn add_product_to_collection(
        &self,
        product_id: ProductId,
        collection_id: CollectionId,
    ) -> Result<Collect, StoreError> {
        let body = CollectBody {
            collect: CollectInput {
                product_id,
                collection_id,
            },
        };
        let envelope: CollectEnvelope = self.post("/collects.json", &body).await?;
        Ok(envelope.collect)
    }

    /// Delete a membership record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails (429 included).
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, collect_id = %collect_id))]
    pub async fn remove_product_from_collection(
        &self,
        collect_id: CollectId,
    ) -> Result<(), StoreError> {
        self.delete(&format!("/collects/{collect_id}.json")).await
    }

    // =========================================================================
    // Blogs & articles
    // =========================================================================

    /// List the store's blogs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let envelope: BlogsEnvelope = self.get("/blogs.json", &[]).await?;
        Ok(envelope.blogs)
    }

    /// Create an article in a blog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain, blog_id = %blog_id))]
    pub async fn create_article(
        &self,
        blog_id: BlogId,
        input: &ArticleInput,
    ) -> Result<Article, StoreError> {
        let envelope: ArticleEnvelope = self
            .post(
                &format!("/blogs/{blog_id}/articles.json"),
                &ArticleBody { article: input },
            )
            .await?;
        Ok(envelope.article)
    }

    /// Update an article.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the input is rejected.
    #[instrument(skip(self, input), fields(store = %self.inner.shop_domain, article_id = %article_id))]
    pub async fn update_article(
        &self,
        blog_id: BlogId,
        article_id: ArticleId,
        input: &ArticleInput,
    ) -> Result<Article, StoreError> {
        let envelope: ArticleEnvelope = self
            .put(
                &format!("/blogs/{blog_id}/articles/{article_id}.json"),
                &ArticleBody { article: input },
            )
            .await?;
        Ok(envelope.article)
    }

    /// Delete an article.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, article_id = %article_id))]
    pub async fn delete_article(
        &self,
        blog_id: BlogId,
        article_id: ArticleId,
    ) -> Result<(), StoreError> {
        self.delete(&format!("/blogs/{blog_id}/articles/{article_id}.json"))
            .await
    }

    // =========================================================================
    // Publications
    // =========================================================================

    /// List the store's sales channel publications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or returns GraphQL errors.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain))]
    pub async fn publications(&self) -> Result<Vec<Publication>, StoreError> {
        let mut publications = Vec::new();
        let mut seen = HashSet::new();
        let mut after = None;

        loop {
            let variables = queries::get_publications::Variables {
                first: PUBLICATIONS_PAGE_SIZE,
                after: after.take(),
            };
            let connection = self.execute::<GetPublications>(variables).await?.publications;

            publications.extend(connection.edges.into_iter().map(|edge| Publication {
                id: edge.node.id,
                name: edge.node.name,
            }));

            match connection.page_info.end_cursor {
                Some(cursor) if connection.page_info.has_next_page && seen.insert(cursor.clone()) => {
                    after = Some(cursor);
                }
                _ => break,
            }
        }

        Ok(publications)
    }

    /// Publish an entity to a publication, now or at `publish_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or reports user errors.
    #[instrument(skip(self), fields(store = %self.inner.shop_domain, target = %target.to_gid()))]
    pub async fn publish(
        &self,
        target: Publishable,
        publication_id: &str,
        publish_date: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let variables = queries::publishable_publish::Variables {
            id: target.to_gid(),
            input: vec![queries::publishable_publish::PublicationInput {
                publication_id: Some(publication_id.to_string()),
                publish_date: publish_date.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            }],
        };

        let response = self.execute::<PublishablePublish>(variables).await?;

        if let Some(payload) = response.publishable_publish
            && !payload.user_errors.is_empty()
        {
            return Err(StoreError::UserErrors(
                payload
                    .user_errors
                    .into_iter()
                    .map(|e| UserError {
                        field: e.field,
                        message: e.message,
                    })
                    .collect(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("shop_domain", &self.inner.shop_domain)
            .field("api_url", &self.inner.api_url)
            .finish_non_exhaustive()
    }
}
