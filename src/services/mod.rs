//! Application services

pub mod movies;

pub use movies::{MovieService, PeopleIds};
