//! HTTP route definitions
//!
//! The API is GraphQL at /graphql; the probes at /healthz and /readyz are plain JSON.

pub mod graphql;
pub mod health;
