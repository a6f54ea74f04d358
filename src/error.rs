//! Domain errors raised by the movie handlers

use std::fmt;

use thiserror::Error;

use crate::db::PersonKind;

/// Which unique title column collided on create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleField {
    Title,
    OriginalTitle,
}

impl TitleField {
    /// Name of the input field as seen by GraphQL clients
    pub fn input_name(self) -> &'static str {
        match self {
            TitleField::Title => "title",
            TitleField::OriginalTitle => "originalTitle",
        }
    }
}

impl fmt::Display for TitleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleField::Title => f.write_str("Title"),
            TitleField::OriginalTitle => f.write_str("Original Title"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("That {field} \"{value}\" already exists.")]
    DuplicateTitle { field: TitleField, value: String },

    #[error("The Movie with id {id}, does not exist.")]
    NotFound { id: i64 },

    #[error("Invalid movie ID: \"{raw}\"")]
    InvalidId { raw: String },

    #[error("The {kind} with id {id}, does not exist.")]
    PersonNotFound { kind: PersonKind, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl MovieError {
    /// Machine-readable code attached to GraphQL errors
    pub fn code(&self) -> &'static str {
        match self {
            MovieError::DuplicateTitle { .. } => "CONFLICT",
            MovieError::NotFound { .. } | MovieError::PersonNotFound { .. } => "NOT_FOUND",
            MovieError::InvalidId { .. } => "BAD_REQUEST",
            MovieError::Database(_) => "DATABASE_ERROR",
        }
    }
}

pub type MovieResult<T> = std::result::Result<T, MovieError>;
