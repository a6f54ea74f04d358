//! Mapping of domain errors onto GraphQL errors with a `code` extension

use async_graphql::{Error, ErrorExtensions};

use crate::error::MovieError;

impl ErrorExtensions for MovieError {
    fn extend(&self) -> Error {
        if let MovieError::Database(e) = self {
            tracing::error!(error = %e, "Movie store failure");
        }

        Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code());
            match self {
                MovieError::DuplicateTitle { field, value } => {
                    ext.set("field", field.input_name());
                    ext.set("value", value.as_str());
                }
                MovieError::NotFound { id } => ext.set("id", id.to_string()),
                MovieError::InvalidId { raw } => ext.set("id", raw.as_str()),
                MovieError::PersonNotFound { kind, id } => {
                    ext.set("kind", kind.to_string());
                    ext.set("id", *id);
                }
                MovieError::Database(_) => {}
            }
        })
    }
}
