//! GraphQL API for movies and their credits
//!
//! Resolvers live in `queries/` and `mutations/`, one `#[derive(Default)]`
//! struct per domain, merged into the roots in `schema.rs`.

mod errors;
pub mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use schema::{MoviesSchema, MutationRoot, QueryRoot, build_schema};
pub use types::{AddPeopleInput, CreateMovieInput, Movie, Person, Title, UpdateMovieInput};
