use async_trait::async_trait;
use quiz_core::model::{Category, OptionIndex, Question, QuestionId, SessionResult};
use std::collections::BTreeSet;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("results file error: {0}")]
    Io(String),
}

/// Insert shape for a question; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestionRecord {
    pub prompt: String,
    pub options: [String; 4],
    pub correct: OptionIndex,
    pub category: Category,
}

impl NewQuestionRecord {
    /// Attach an id and validate into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the prompt or an option is blank.
    pub fn into_question(self, id: QuestionId) -> Result<Question, StorageError> {
        Question::new(id, self.prompt, self.options, self.correct, self.category)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Read side of the question table plus the insert used by the bootstrap seed.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Distinct categories, sorted by label.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the categories cannot be read.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// All questions for a category, ordered by id. Unknown categories yield
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be read or mapped.
    async fn questions_for(&self, category: &Category) -> Result<Vec<Question>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the count query fails.
    async fn count_questions(&self) -> Result<u64, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError>;
}

/// Append-only destination for finished sessions.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Append one row. Never rewrites earlier rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the row cannot be written.
    async fn append(&self, result: &SessionResult) -> Result<(), StorageError>;

    /// Every stored result, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored rows cannot be read or parsed.
    async fn list_results(&self) -> Result<Vec<SessionResult>, StorageError>;
}

/// Simple in-memory question store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let distinct: BTreeSet<Category> = guard.iter().map(|q| q.category().clone()).collect();
        Ok(distinct.into_iter().collect())
    }

    async fn questions_for(&self, category: &Category) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<Question> = guard
            .iter()
            .filter(|q| q.category() == category)
            .cloned()
            .collect();
        found.sort_by_key(Question::id);
        Ok(found)
    }

    async fn count_questions(&self) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }

    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = guard.iter().map(|q| q.id().value()).max().unwrap_or(0) + 1;
        let id = QuestionId::new(next);
        guard.push(record.into_question(id)?);
        Ok(id)
    }
}

/// In-memory result sink; can be told to fail so callers can exercise the
/// "save failed" path.
#[derive(Clone, Default)]
pub struct InMemoryResultSink {
    rows: Arc<Mutex<Vec<SessionResult>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryResultSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }
}

#[async_trait]
impl ResultSink for InMemoryResultSink {
    async fn append(&self, result: &SessionResult) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StorageError::Io("results file is not writable".into()));
        }
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(result.clone());
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<SessionResult>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates the question store and the result sink behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultSink>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(InMemoryRepository::new());
        let results: Arc<dyn ResultSink> = Arc::new(InMemoryResultSink::new());
        Self { questions, results }
    }
}
