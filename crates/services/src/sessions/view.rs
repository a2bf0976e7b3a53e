use std::sync::Arc;

use quiz_core::model::SessionResult;
use storage::repository::ResultSink;

use crate::error::SessionError;

/// Presentation-agnostic list item for a saved session result.
///
/// No pre-formatted strings; the UI decides how to show the percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreListItem {
    pub username: String,
    pub category: String,
    pub score: u32,
    pub total: u32,
    pub percent: Option<u32>,
}

impl ScoreListItem {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            username: result.username().as_str().to_owned(),
            category: result.category().as_str().to_owned(),
            score: result.score(),
            total: result.total_questions(),
            percent: result.percent(),
        }
    }
}

/// Read-only access to past results for the scores screen.
#[derive(Clone)]
pub struct ScoreHistoryService {
    results: Arc<dyn ResultSink>,
}

impl ScoreHistoryService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultSink>) -> Self {
        Self { results }
    }

    /// Most recent results first, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the results file cannot be read.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ScoreListItem>, SessionError> {
        let results = self.results.list_results().await?;
        Ok(results
            .iter()
            .rev()
            .take(limit)
            .map(ScoreListItem::from_result)
            .collect())
    }
}
