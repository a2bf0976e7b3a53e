use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{QuestionRepository, ResultSink, Storage, StorageError};
use crate::results::CsvResultSink;

mod mapping;
mod migrate;
mod question_repo;
mod seed;

pub use seed::{sample_questions, seed_sample_questions};

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Seed(#[from] StorageError),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or the
    /// connection PRAGMAs fail.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite` for questions and a CSV file for
    /// results. Runs migrations and seeds the sample questions into an empty
    /// table.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection, migrations or seeding fail.
    pub async fn open(
        database_url: &str,
        results_path: impl AsRef<Path>,
    ) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let seeded = seed_sample_questions(&repo).await?;
        if seeded > 0 {
            tracing::info!(seeded, "seeded sample questions into empty table");
        }

        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        let results: Arc<dyn ResultSink> = Arc::new(CsvResultSink::new(results_path.as_ref()));
        Ok(Self { questions, results })
    }
}
