//! GraphQL operations against the Admin API.
//!
//! Uses `graphql_client` to generate type-safe Rust code from the operations
//! in `graphql/admin/queries/`.

use graphql_client::GraphQLQuery;

/// ISO 8601 date-time string.
type DateTime = String;

/// Lists the store's sales channel publications, one page at a time.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/publications.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone"
)]
pub struct GetPublications;

/// Publishes a resource to one or more publications, optionally at a
/// future `publishDate`.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/publications.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone",
    skip_serializing_none
)]
pub struct PublishablePublish;
