//! Movies API - GraphQL service for a movie catalogue
//!
//! Movies, their titles and the people credited on them are stored in SQLite
//! and exposed as GraphQL at /graphql.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
pub use error::{MovieError, MovieResult};
