//! CSV-backed result sink.
//!
//! One row per finished session under the header
//! `Username,Score,TotalQuestions,Category`. The file is only ever opened in
//! append mode, so earlier rows are never rewritten.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use quiz_core::model::{Category, SessionResult, Username};
use serde::{Deserialize, Serialize};

use crate::repository::{ResultSink, StorageError};

#[derive(Debug, Serialize, Deserialize)]
struct ResultRow {
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Score")]
    score: u32,
    #[serde(rename = "TotalQuestions")]
    total_questions: u32,
    #[serde(rename = "Category")]
    category: String,
}

impl From<&SessionResult> for ResultRow {
    fn from(result: &SessionResult) -> Self {
        Self {
            username: result.username().as_str().to_owned(),
            score: result.score(),
            total_questions: result.total_questions(),
            category: result.category().as_str().to_owned(),
        }
    }
}

impl ResultRow {
    fn into_result(self) -> Result<SessionResult, StorageError> {
        let username = Username::parse(&self.username).map_err(ser)?;
        let category = Category::new(self.category).map_err(ser)?;
        SessionResult::new(username, self.score, self.total_questions, category).map_err(ser)
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn io<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Io(e.to_string())
}

/// Appends finished sessions to a CSV file, creating it (and its parent
/// directory) on first use.
pub struct CsvResultSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvResultSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn append_row(&self, row: &ResultRow) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(io)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io)?;
        // An empty file (new, or truncated by hand) gets the header first.
        let needs_header = file.metadata().map_err(io)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(row).map_err(io)?;
        writer.flush().map_err(io)?;
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<SessionResult>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(io)?;
        let mut results = Vec::new();
        for row in reader.deserialize::<ResultRow>() {
            let row = row.map_err(ser)?;
            results.push(row.into_result()?);
        }
        Ok(results)
    }
}

#[async_trait]
impl ResultSink for CsvResultSink {
    async fn append(&self, result: &SessionResult) -> Result<(), StorageError> {
        self.append_row(&ResultRow::from(result))?;
        tracing::debug!(path = %self.path.display(), "appended session result");
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<SessionResult>, StorageError> {
        self.read_rows()
    }
}
