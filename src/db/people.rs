//! Directors, musicians and writers
//!
//! The three collections share one shape (`id`, `name`) and one kind of join
//! table, so a single repository parameterized by [PersonKind] serves all of
//! them. Table names come from the enum and never from user input.

use std::fmt;

use anyhow::Result;
use sqlx::{SqliteConnection, SqlitePool};

/// Which people collection a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Director,
    Musician,
    Writer,
}

impl PersonKind {
    pub const ALL: [PersonKind; 3] = [PersonKind::Director, PersonKind::Musician, PersonKind::Writer];

    /// Table holding the people themselves
    pub fn table(self) -> &'static str {
        match self {
            PersonKind::Director => "directors",
            PersonKind::Musician => "musicians",
            PersonKind::Writer => "writers",
        }
    }

    /// Join table linking movies to this kind of person
    pub fn join_table(self) -> &'static str {
        match self {
            PersonKind::Director => "movie_directors",
            PersonKind::Musician => "movie_musicians",
            PersonKind::Writer => "movie_writers",
        }
    }

    /// Foreign key column in [Self::join_table]
    pub fn join_column(self) -> &'static str {
        match self {
            PersonKind::Director => "director_id",
            PersonKind::Musician => "musician_id",
            PersonKind::Writer => "writer_id",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PersonKind::Director => "Director",
            PersonKind::Musician => "Musician",
            PersonKind::Writer => "Writer",
        };
        f.write_str(label)
    }
}

/// Person record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PersonRecord {
    pub id: i64,
    pub name: String,
}

pub struct PeopleRepository {
    pool: SqlitePool,
    kind: PersonKind,
}

impl PeopleRepository {
    pub fn new(pool: SqlitePool, kind: PersonKind) -> Self {
        Self { pool, kind }
    }

    /// Create a person
    pub async fn create(&self, name: &str) -> Result<PersonRecord> {
        let record = sqlx::query_as::<_, PersonRecord>(&format!(
            "INSERT INTO {} (name) VALUES (?1) RETURNING id, name",
            self.kind.table()
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get a person by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<PersonRecord>> {
        let record = sqlx::query_as::<_, PersonRecord>(&format!(
            "SELECT id, name FROM {} WHERE id = ?1",
            self.kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List the people of this kind associated with a movie
    pub async fn list_by_movie(&self, movie_id: i64) -> Result<Vec<PersonRecord>> {
        let mut conn = self.pool.acquire().await?;
        list_for_movie(&mut conn, self.kind, movie_id).await
    }
}

pub(crate) async fn exists(conn: &mut SqliteConnection, kind: PersonKind, id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(&format!(
        "SELECT id FROM {} WHERE id = ?1",
        kind.table()
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(found.is_some())
}

/// Link a person to a movie. Linking twice is a no-op.
pub(crate) async fn connect(
    conn: &mut SqliteConnection,
    kind: PersonKind,
    movie_id: i64,
    person_id: i64,
) -> Result<()> {
    sqlx::query(&format!(
        "INSERT OR IGNORE INTO {} (movie_id, {}) VALUES (?1, ?2)",
        kind.join_table(),
        kind.join_column()
    ))
    .bind(movie_id)
    .bind(person_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn list_for_movie(
    conn: &mut SqliteConnection,
    kind: PersonKind,
    movie_id: i64,
) -> Result<Vec<PersonRecord>> {
    let records = sqlx::query_as::<_, PersonRecord>(&format!(
        r#"
        SELECT p.id, p.name
        FROM {people} p
        JOIN {join} j ON j.{column} = p.id
        WHERE j.movie_id = ?1
        ORDER BY p.id
        "#,
        people = kind.table(),
        join = kind.join_table(),
        column = kind.join_column()
    ))
    .bind(movie_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}
