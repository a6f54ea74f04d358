//! GraphQL schema definition
//!
//! Query and mutation roots are merged from the per-domain resolver structs.

use async_graphql::{EmptySubscription, MergedObject, Schema, extensions::Tracing};

use crate::services::MovieService;

use super::mutations::MovieMutations;
use super::queries::MovieQueries;

/// The GraphQL schema type
pub type MoviesSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(MovieQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(MovieMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(service: MovieService) -> MoviesSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(service)
        .extension(Tracing)
        .finish()
}
