use std::path::Path;
use std::sync::Arc;

use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::sessions::{QuizLoopService, ScoreHistoryService};

/// Assembles the app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    score_history: Arc<ScoreHistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` questions and a CSV results file.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        results_path: impl AsRef<Path>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::open(db_url, results_path).await?;
        Ok(Self::from_storage(&storage))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        let quiz_loop = Arc::new(QuizLoopService::new(
            Arc::clone(&storage.questions),
            Arc::clone(&storage.results),
        ));
        let score_history = Arc::new(ScoreHistoryService::new(Arc::clone(&storage.results)));
        Self {
            quiz_loop,
            score_history,
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn score_history(&self) -> Arc<ScoreHistoryService> {
        Arc::clone(&self.score_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{Persistence, QuizSession, QuizStep};
    use quiz_core::model::{AnswerChoice, Category};
    use storage::sqlite::seed_sample_questions;

    #[tokio::test]
    async fn services_share_the_same_result_sink() {
        let storage = Storage::in_memory();
        seed_sample_questions(storage.questions.as_ref()).await.unwrap();
        let services = AppServices::from_storage(&storage);
        assert!(services.score_history().recent(5).await.unwrap().is_empty());

        let quiz_loop = services.quiz_loop();
        let mut session = QuizSession::new();
        session.submit_name("Ada").unwrap();
        let step = quiz_loop
            .submit_setup(&mut session, Category::new("Geography").unwrap(), "10")
            .await
            .unwrap();
        let QuizStep::Question(ticket) = step else {
            panic!("expected a question, got {step:?}");
        };
        let correct = session.current_question().unwrap().correct();
        let step = quiz_loop
            .answer(&mut session, ticket, AnswerChoice::Option(correct))
            .await;
        assert!(matches!(
            step,
            QuizStep::Finished {
                persistence: Persistence::Saved,
                ..
            }
        ));

        let history = services.score_history().recent(5).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].username, "Ada");
        assert_eq!(history[0].category, "Geography");
        assert_eq!((history[0].score, history[0].total), (1, 1));
    }
}
