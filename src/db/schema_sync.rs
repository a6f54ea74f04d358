//! Start-up schema creation
//!
//! Creates every table the service needs with `CREATE TABLE IF NOT EXISTS`.
//! Does NOT alter existing tables; column changes require a database wipe.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub errors: Vec<String>,
}

/// Table definitions in dependency order (referenced tables first)
const TABLES: &[(&str, &str)] = &[
    (
        "movies",
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            status TEXT NOT NULL,
            user_name TEXT NOT NULL,
            film_description TEXT NOT NULL,
            duration INTEGER NOT NULL,
            movie_banner TEXT,
            link_wiki TEXT,
            release_date TEXT,
            audience_score REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "titles",
        r#"
        CREATE TABLE IF NOT EXISTS titles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            movie_id INTEGER NOT NULL UNIQUE REFERENCES movies(id) ON DELETE CASCADE,
            title TEXT NOT NULL UNIQUE,
            original_title TEXT NOT NULL UNIQUE,
            romaji_title TEXT
        )
        "#,
    ),
    (
        "directors",
        r#"
        CREATE TABLE IF NOT EXISTS directors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    ),
    (
        "musicians",
        r#"
        CREATE TABLE IF NOT EXISTS musicians (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    ),
    (
        "writers",
        r#"
        CREATE TABLE IF NOT EXISTS writers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    ),
    (
        "movie_directors",
        r#"
        CREATE TABLE IF NOT EXISTS movie_directors (
            movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            director_id INTEGER NOT NULL REFERENCES directors(id) ON DELETE CASCADE,
            PRIMARY KEY (movie_id, director_id)
        )
        "#,
    ),
    (
        "movie_musicians",
        r#"
        CREATE TABLE IF NOT EXISTS movie_musicians (
            movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            musician_id INTEGER NOT NULL REFERENCES musicians(id) ON DELETE CASCADE,
            PRIMARY KEY (movie_id, musician_id)
        )
        "#,
    ),
    (
        "movie_writers",
        r#"
        CREATE TABLE IF NOT EXISTS movie_writers (
            movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
            writer_id INTEGER NOT NULL REFERENCES writers(id) ON DELETE CASCADE,
            PRIMARY KEY (movie_id, writer_id)
        )
        "#,
    ),
];

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create any missing table.
///
/// This should be called at startup before the GraphQL schema serves requests.
pub async fn sync_schema(pool: &SqlitePool) -> SchemaSyncResult {
    let mut result = SchemaSyncResult::default();

    for (table_name, create_sql) in TABLES {
        let existed = table_exists(pool, table_name).await.unwrap_or(false);
        if existed {
            debug!("Table {} already exists", table_name);
            continue;
        }

        match sqlx::query(create_sql.trim()).execute(pool).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    result
}
