//! Movie handlers: validation followed by persistence through a [MovieStore]
//!
//! Each mutating handler runs its whole sequence (checks and writes) inside
//! one unit of work, so a failure part-way leaves nothing behind.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::db::{CreateMovie, CreateTitle, MovieAggregate, MovieStore, PersonKind, UpdateMovie};
use crate::error::{MovieError, MovieResult, TitleField};

/// Person ids to associate with a movie, one list per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeopleIds {
    pub directors: Vec<i64>,
    pub musicians: Vec<i64>,
    pub writers: Vec<i64>,
}

impl PeopleIds {
    /// Ids in association order: musicians, then writers, then directors
    fn in_order(&self) -> impl Iterator<Item = (PersonKind, i64)> + '_ {
        let musicians = self.musicians.iter().map(|id| (PersonKind::Musician, *id));
        let writers = self.writers.iter().map(|id| (PersonKind::Writer, *id));
        let directors = self.directors.iter().map(|id| (PersonKind::Director, *id));
        musicians.chain(writers).chain(directors)
    }

    pub fn is_empty(&self) -> bool {
        self.directors.is_empty() && self.musicians.is_empty() && self.writers.is_empty()
    }
}

/// The movie handlers, sharing one injected store
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    /// Create a movie and its title.
    ///
    /// Fails with [MovieError::DuplicateTitle] when either title column is
    /// already taken; nothing is written in that case.
    pub async fn create_movie(
        &self,
        movie: CreateMovie,
        title: CreateTitle,
    ) -> MovieResult<MovieAggregate> {
        let mut uow = self.store.begin().await?;

        if uow.find_title_by_title(&title.title).await?.is_some() {
            warn!(title = %title.title, "Rejected movie with duplicate title");
            return Err(MovieError::DuplicateTitle {
                field: TitleField::Title,
                value: title.title,
            });
        }
        if uow
            .find_title_by_original_title(&title.original_title)
            .await?
            .is_some()
        {
            warn!(
                original_title = %title.original_title,
                "Rejected movie with duplicate original title"
            );
            return Err(MovieError::DuplicateTitle {
                field: TitleField::OriginalTitle,
                value: title.original_title,
            });
        }

        let (movie, title) = uow.create_movie(&movie, &title).await?;
        uow.commit().await?;

        info!(movie_id = movie.id, title = %title.title, "Created movie");

        Ok(MovieAggregate {
            movie,
            title,
            directors: Vec::new(),
            musicians: Vec::new(),
            writers: Vec::new(),
        })
    }

    /// Apply a partial update to an existing movie
    pub async fn update_movie(&self, id: i64, update: UpdateMovie) -> MovieResult<MovieAggregate> {
        let mut uow = self.store.begin().await?;

        if uow.find_movie(id).await?.is_none() {
            warn!(movie_id = id, "Update of unknown movie");
            return Err(MovieError::NotFound { id });
        }

        if update.is_empty() {
            debug!(movie_id = id, "Update without fields only touches updated_at");
        }

        uow.update_movie(id, &update)
            .await?
            .ok_or(MovieError::NotFound { id })?;
        let aggregate = uow
            .load_aggregate(id)
            .await?
            .ok_or(MovieError::NotFound { id })?;
        uow.commit().await?;

        info!(movie_id = id, "Updated movie");
        Ok(aggregate)
    }

    /// Delete a movie, returning a confirmation message
    pub async fn delete_movie(&self, id: i64) -> MovieResult<String> {
        let mut uow = self.store.begin().await?;

        if uow.find_movie(id).await?.is_none() {
            warn!(movie_id = id, "Delete of unknown movie");
            return Err(MovieError::NotFound { id });
        }

        if !uow.delete_movie(id).await? {
            return Err(MovieError::NotFound { id });
        }
        uow.commit().await?;

        info!(movie_id = id, "Deleted movie");
        Ok(format!("The Movie with {} Id was deleted", id))
    }

    /// Associate people with a movie.
    ///
    /// Either every association of the call is made or none is.
    pub async fn add_people(&self, movie_id: i64, people: PeopleIds) -> MovieResult<MovieAggregate> {
        let mut uow = self.store.begin().await?;

        if uow.find_movie(movie_id).await?.is_none() {
            warn!(movie_id, "Adding people to unknown movie");
            return Err(MovieError::NotFound { id: movie_id });
        }

        if people.is_empty() {
            debug!(movie_id, "No people to add");
        }

        for (kind, person_id) in people.in_order() {
            if !uow.person_exists(kind, person_id).await? {
                warn!(movie_id, person_id, kind = %kind, "Unknown person, rolling back");
                return Err(MovieError::PersonNotFound {
                    kind,
                    id: person_id,
                });
            }
            uow.connect_person(movie_id, kind, person_id).await?;
            debug!(movie_id, person_id, kind = %kind, "Connected person");
        }

        let aggregate = uow
            .load_aggregate(movie_id)
            .await?
            .ok_or(MovieError::NotFound { id: movie_id })?;
        uow.commit().await?;

        info!(
            movie_id,
            directors = people.directors.len(),
            musicians = people.musicians.len(),
            writers = people.writers.len(),
            "Added people to movie"
        );
        Ok(aggregate)
    }

    /// Fetch one movie, `None` when absent
    pub async fn get_movie(&self, id: i64) -> MovieResult<Option<MovieAggregate>> {
        Ok(self.store.get_aggregate(id).await?)
    }

    /// Fetch every movie
    pub async fn list_movies(&self) -> MovieResult<Vec<MovieAggregate>> {
        Ok(self.store.list_aggregates().await?)
    }
}
