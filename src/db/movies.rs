//! Movie and title database repository
//!
//! Query functions take a `&mut SqliteConnection` so that the same SQL runs
//! against a pooled connection or inside a transaction. [MovieRepository]
//! wraps them for pool-level reads.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use super::people::{self, PersonKind, PersonRecord};

const MOVIE_COLUMNS: &str = "id, status, user_name, film_description, duration, movie_banner, \
     link_wiki, release_date, audience_score, created_at, updated_at";

const TITLE_COLUMNS: &str = "id, movie_id, title, original_title, romaji_title";

/// Movie record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: i64,
    pub status: String,
    /// Name of the user who submitted the movie
    pub user_name: String,
    pub film_description: String,
    /// Running time in minutes
    pub duration: i32,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub audience_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title record, one per movie
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TitleRecord {
    pub id: i64,
    pub movie_id: i64,
    pub title: String,
    pub original_title: String,
    pub romaji_title: Option<String>,
}

/// Input for creating a movie
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub status: String,
    pub user_name: String,
    pub film_description: String,
    pub duration: i32,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub audience_score: Option<f64>,
}

/// Title fields written together with a new movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTitle {
    pub title: String,
    pub original_title: String,
    pub romaji_title: Option<String>,
}

/// Input for updating a movie. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovie {
    pub status: Option<String>,
    pub user_name: Option<String>,
    pub film_description: Option<String>,
    pub duration: Option<i32>,
    pub movie_banner: Option<String>,
    pub link_wiki: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateMovie {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.user_name.is_none()
            && self.film_description.is_none()
            && self.duration.is_none()
            && self.movie_banner.is_none()
            && self.link_wiki.is_none()
            && self.release_date.is_none()
    }
}

/// A movie joined with its title and every associated person
#[derive(Debug, Clone, PartialEq)]
pub struct MovieAggregate {
    pub movie: MovieRecord,
    pub title: TitleRecord,
    pub directors: Vec<PersonRecord>,
    pub musicians: Vec<PersonRecord>,
    pub writers: Vec<PersonRecord>,
}

pub struct MovieRepository {
    pool: SqlitePool,
}

impl MovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a movie with its title and people
    pub async fn get_aggregate(&self, id: i64) -> Result<Option<MovieAggregate>> {
        let mut conn = self.pool.acquire().await?;
        load_aggregate(&mut conn, id).await
    }

    /// List every movie with its title and people, oldest first
    pub async fn list_aggregates(&self) -> Result<Vec<MovieAggregate>> {
        let mut conn = self.pool.acquire().await?;
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM movies ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        let mut aggregates = Vec::with_capacity(ids.len());
        for id in ids {
            // A concurrent delete between the two reads just drops the row
            if let Some(aggregate) = load_aggregate(&mut conn, id).await? {
                aggregates.push(aggregate);
            }
        }
        Ok(aggregates)
    }

    /// Count movies
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub(crate) async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<MovieRecord>> {
    let record = sqlx::query_as::<_, MovieRecord>(&format!(
        "SELECT {} FROM movies WHERE id = ?1",
        MOVIE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub(crate) async fn find_title_by_title(
    conn: &mut SqliteConnection,
    title: &str,
) -> Result<Option<TitleRecord>> {
    let record = sqlx::query_as::<_, TitleRecord>(&format!(
        "SELECT {} FROM titles WHERE title = ?1",
        TITLE_COLUMNS
    ))
    .bind(title)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub(crate) async fn find_title_by_original_title(
    conn: &mut SqliteConnection,
    original_title: &str,
) -> Result<Option<TitleRecord>> {
    let record = sqlx::query_as::<_, TitleRecord>(&format!(
        "SELECT {} FROM titles WHERE original_title = ?1",
        TITLE_COLUMNS
    ))
    .bind(original_title)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub(crate) async fn find_title_by_movie(
    conn: &mut SqliteConnection,
    movie_id: i64,
) -> Result<Option<TitleRecord>> {
    let record = sqlx::query_as::<_, TitleRecord>(&format!(
        "SELECT {} FROM titles WHERE movie_id = ?1",
        TITLE_COLUMNS
    ))
    .bind(movie_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Insert a movie and its title. Callers run this inside a transaction so
/// the pair is written atomically.
pub(crate) async fn create_with_title(
    conn: &mut SqliteConnection,
    input: &CreateMovie,
    title: &CreateTitle,
) -> Result<(MovieRecord, TitleRecord)> {
    let now = Utc::now();

    let movie = sqlx::query_as::<_, MovieRecord>(&format!(
        r#"
        INSERT INTO movies (
            status, user_name, film_description, duration, movie_banner,
            link_wiki, release_date, audience_score, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
        RETURNING {}
        "#,
        MOVIE_COLUMNS
    ))
    .bind(&input.status)
    .bind(&input.user_name)
    .bind(&input.film_description)
    .bind(input.duration)
    .bind(&input.movie_banner)
    .bind(&input.link_wiki)
    .bind(input.release_date)
    .bind(input.audience_score)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    let title = sqlx::query_as::<_, TitleRecord>(&format!(
        r#"
        INSERT INTO titles (movie_id, title, original_title, romaji_title)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING {}
        "#,
        TITLE_COLUMNS
    ))
    .bind(movie.id)
    .bind(&title.title)
    .bind(&title.original_title)
    .bind(&title.romaji_title)
    .fetch_one(&mut *conn)
    .await?;

    Ok((movie, title))
}

/// Apply a partial update. Returns `None` when no row has the id.
pub(crate) async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: &UpdateMovie,
) -> Result<Option<MovieRecord>> {
    let record = sqlx::query_as::<_, MovieRecord>(&format!(
        r#"
        UPDATE movies SET
            status = COALESCE(?2, status),
            user_name = COALESCE(?3, user_name),
            film_description = COALESCE(?4, film_description),
            duration = COALESCE(?5, duration),
            movie_banner = COALESCE(?6, movie_banner),
            link_wiki = COALESCE(?7, link_wiki),
            release_date = COALESCE(?8, release_date),
            updated_at = ?9
        WHERE id = ?1
        RETURNING {}
        "#,
        MOVIE_COLUMNS
    ))
    .bind(id)
    .bind(&input.status)
    .bind(&input.user_name)
    .bind(&input.film_description)
    .bind(input.duration)
    .bind(&input.movie_banner)
    .bind(&input.link_wiki)
    .bind(input.release_date)
    .bind(Utc::now())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Delete a movie. Title and association rows cascade.
pub(crate) async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM movies WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load a movie with its title and all three people lists
pub(crate) async fn load_aggregate(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<MovieAggregate>> {
    let Some(movie) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    let title = find_title_by_movie(conn, id)
        .await?
        .ok_or_else(|| anyhow!("Movie {} has no title row", id))?;

    let directors = people::list_for_movie(conn, PersonKind::Director, id).await?;
    let musicians = people::list_for_movie(conn, PersonKind::Musician, id).await?;
    let writers = people::list_for_movie(conn, PersonKind::Writer, id).await?;

    Ok(Some(MovieAggregate {
        movie,
        title,
        directors,
        musicians,
        writers,
    }))
}
