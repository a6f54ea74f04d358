//! Data-access port used by the movie handlers
//!
//! [MovieStore] is what the service layer is given instead of a database
//! handle. Every multi-step mutation goes through a [MovieUnitOfWork], which
//! the SQLite implementation backs with one transaction. Dropping a unit of
//! work without calling [MovieUnitOfWork::commit] rolls it back.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use super::movies::{self, CreateMovie, CreateTitle, MovieAggregate, MovieRecord, TitleRecord, UpdateMovie};
use super::people::{self, PersonKind};
use super::Database;

/// Entry point to the backing store
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Open a unit of work. All operations on it commit or roll back together.
    async fn begin(&self) -> Result<Box<dyn MovieUnitOfWork>>;

    /// Read a movie with its title and people outside any unit of work
    async fn get_aggregate(&self, id: i64) -> Result<Option<MovieAggregate>>;

    /// Read every movie with its title and people
    async fn list_aggregates(&self) -> Result<Vec<MovieAggregate>>;
}

/// Operations available inside one unit of work
#[async_trait]
pub trait MovieUnitOfWork: Send {
    async fn find_title_by_title(&mut self, title: &str) -> Result<Option<TitleRecord>>;

    async fn find_title_by_original_title(
        &mut self,
        original_title: &str,
    ) -> Result<Option<TitleRecord>>;

    /// Insert a movie together with its title
    async fn create_movie(
        &mut self,
        movie: &CreateMovie,
        title: &CreateTitle,
    ) -> Result<(MovieRecord, TitleRecord)>;

    async fn find_movie(&mut self, id: i64) -> Result<Option<MovieRecord>>;

    async fn update_movie(&mut self, id: i64, update: &UpdateMovie) -> Result<Option<MovieRecord>>;

    /// Returns false when no row had the id
    async fn delete_movie(&mut self, id: i64) -> Result<bool>;

    async fn person_exists(&mut self, kind: PersonKind, id: i64) -> Result<bool>;

    /// Associate an existing person with an existing movie
    async fn connect_person(&mut self, movie_id: i64, kind: PersonKind, person_id: i64)
    -> Result<()>;

    async fn load_aggregate(&mut self, id: i64) -> Result<Option<MovieAggregate>>;

    /// Make every change of this unit of work durable. Further calls fail.
    async fn commit(&mut self) -> Result<()>;
}

/// Unit of work over one SQLite transaction
pub struct SqliteUnitOfWork {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteUnitOfWork {
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx: Some(tx) }
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| anyhow!("Unit of work already committed"))
    }
}

#[async_trait]
impl MovieUnitOfWork for SqliteUnitOfWork {
    async fn find_title_by_title(&mut self, title: &str) -> Result<Option<TitleRecord>> {
        movies::find_title_by_title(self.conn()?, title).await
    }

    async fn find_title_by_original_title(
        &mut self,
        original_title: &str,
    ) -> Result<Option<TitleRecord>> {
        movies::find_title_by_original_title(self.conn()?, original_title).await
    }

    async fn create_movie(
        &mut self,
        movie: &CreateMovie,
        title: &CreateTitle,
    ) -> Result<(MovieRecord, TitleRecord)> {
        movies::create_with_title(self.conn()?, movie, title).await
    }

    async fn find_movie(&mut self, id: i64) -> Result<Option<MovieRecord>> {
        movies::find_by_id(self.conn()?, id).await
    }

    async fn update_movie(&mut self, id: i64, update: &UpdateMovie) -> Result<Option<MovieRecord>> {
        movies::update(self.conn()?, id, update).await
    }

    async fn delete_movie(&mut self, id: i64) -> Result<bool> {
        movies::delete(self.conn()?, id).await
    }

    async fn person_exists(&mut self, kind: PersonKind, id: i64) -> Result<bool> {
        people::exists(self.conn()?, kind, id).await
    }

    async fn connect_person(
        &mut self,
        movie_id: i64,
        kind: PersonKind,
        person_id: i64,
    ) -> Result<()> {
        people::connect(self.conn()?, kind, movie_id, person_id).await
    }

    async fn load_aggregate(&mut self, id: i64) -> Result<Option<MovieAggregate>> {
        movies::load_aggregate(self.conn()?, id).await
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| anyhow!("Unit of work already committed"))?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl MovieStore for Database {
    async fn begin(&self) -> Result<Box<dyn MovieUnitOfWork>> {
        let tx = Database::begin(self).await?;
        Ok(Box::new(SqliteUnitOfWork::new(tx)))
    }

    async fn get_aggregate(&self, id: i64) -> Result<Option<MovieAggregate>> {
        self.movies().get_aggregate(id).await
    }

    async fn list_aggregates(&self) -> Result<Vec<MovieAggregate>> {
        self.movies().list_aggregates().await
    }
}
