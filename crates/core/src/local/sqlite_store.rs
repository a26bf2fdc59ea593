//! SQLite-backed catalog store.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::{CachedCatalog, CatalogStore, LocalCatalog, LocalMovie, StoreError};

/// SQLite-backed catalog store.
///
/// The connection sits behind a fair async mutex, so operations run in the
/// order they were submitted. Each operation runs on the blocking pool.
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

fn db_error(e: rusqlite::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Like [`db_error`], but a stored value of the wrong type or range is
/// reported as corruption.
fn read_error(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => StoreError::Corrupted(e.to_string()),
        other => db_error(other),
    }
}

impl SqliteCatalogStore {
    /// Open the database at `path`, creating the file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- The single cached catalog page
            CREATE TABLE IF NOT EXISTS cached_catalog (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                page INTEGER NOT NULL,
                total_pages INTEGER NOT NULL,
                timestamp TEXT NOT NULL
            );

            -- Movies of the cached page, in API order
            CREATE TABLE IF NOT EXISTS cached_movies (
                position INTEGER PRIMARY KEY,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                poster_path TEXT NOT NULL
            );
            "#,
        )
        .map_err(db_error)?;

        Ok(())
    }

    /// Run `f` against the connection once every earlier operation is done.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let mut conn = Arc::clone(&self.conn).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *conn))
            .await
            .map_err(|e| StoreError::Unavailable(format!("SQLite task failed: {}", e)))?
    }

    fn clear(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute("DELETE FROM cached_movies", [])?;
        conn.execute("DELETE FROM cached_catalog", [])?;
        Ok(())
    }

    fn load_movies(conn: &Connection) -> Result<Vec<LocalMovie>, StoreError> {
        let mut stmt = conn
            .prepare("SELECT id, title, poster_path FROM cached_movies ORDER BY position")
            .map_err(db_error)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(LocalMovie {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    poster_path: row.get(2)?,
                })
            })
            .map_err(db_error)?;

        let mut movies = Vec::new();
        for row in rows {
            movies.push(row.map_err(read_error)?);
        }
        Ok(movies)
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn delete_cached_catalog(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction().map_err(db_error)?;
            Self::clear(&tx).map_err(db_error)?;
            tx.commit().map_err(db_error)
        })
        .await
    }

    async fn insert(
        &self,
        catalog: &LocalCatalog,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let catalog = catalog.clone();
        let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);

        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(db_error)?;
            Self::clear(&tx).map_err(db_error)?;

            tx.execute(
                "INSERT INTO cached_catalog (id, page, total_pages, timestamp) VALUES (1, ?, ?, ?)",
                params![catalog.page, catalog.total_pages, timestamp],
            )
            .map_err(db_error)?;

            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO cached_movies (position, id, title, poster_path)
                         VALUES (?, ?, ?, ?)",
                    )
                    .map_err(db_error)?;
                for (position, movie) in catalog.movies.iter().enumerate() {
                    stmt.execute(params![
                        position as i64,
                        movie.id,
                        movie.title,
                        movie.poster_path
                    ])
                    .map_err(db_error)?;
                }
            }

            tx.commit().map_err(db_error)
        })
        .await
    }

    async fn retrieve(&self) -> Result<Option<CachedCatalog>, StoreError> {
        self.with_conn(|conn| {
            let header = conn
                .query_row(
                    "SELECT page, total_pages, timestamp FROM cached_catalog WHERE id = 1",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(read_error)?;

            let Some((page, total_pages, timestamp)) = header else {
                return Ok(None);
            };

            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Corrupted(format!("timestamp {:?}: {}", timestamp, e)))?;

            let catalog = LocalCatalog {
                page,
                total_pages,
                movies: Self::load_movies(conn)?,
            };

            Ok(Some(CachedCatalog::new(catalog, timestamp)))
        })
        .await
    }
}
