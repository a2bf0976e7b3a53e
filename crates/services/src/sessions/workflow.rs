use std::sync::Arc;

use quiz_core::model::{AnswerChoice, Category, SessionResult};
use storage::repository::{QuestionRepository, ResultSink};

use super::service::{AnswerOutcome, QuestionTicket, QuizSession, StartOutcome, TickOutcome};
use crate::error::SessionError;

/// Whether a finished session made it into the results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    /// The write failed; the message is shown to the player as a warning.
    Failed(String),
}

/// What the presentation layer should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    /// Nothing changed (stale ticket, duplicate submit).
    Unchanged,
    /// Countdown moved; same question.
    Counting { remaining_secs: u32 },
    /// A (new) question is on screen.
    Question(QuestionTicket),
    Finished {
        result: SessionResult,
        persistence: Persistence,
    },
}

/// Orchestrates the quiz session against the question store and result sink.
#[derive(Clone)]
pub struct QuizLoopService {
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn ResultSink>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>, results: Arc<dyn ResultSink>) -> Self {
        Self { questions, results }
    }

    /// Categories the setup screen may offer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn list_categories(&self) -> Result<Vec<Category>, SessionError> {
        Ok(self.questions.list_categories().await?)
    }

    /// Load the category's questions and start the quiz. An empty category
    /// finishes (and is saved) right away.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCategory` for a category the store does not
    /// list, `SessionError::Storage` if loading fails, or the session's own
    /// transition error.
    pub async fn submit_setup(
        &self,
        session: &mut QuizSession,
        category: Category,
        time_limit_text: &str,
    ) -> Result<QuizStep, SessionError> {
        let known = self.questions.list_categories().await?;
        if !known.contains(&category) {
            return Err(SessionError::UnknownCategory(category));
        }

        let questions = self.questions.questions_for(&category).await?;
        match session.begin(category, time_limit_text, questions)? {
            StartOutcome::Ready(ticket) => Ok(QuizStep::Question(ticket)),
            StartOutcome::Empty(result) => Ok(self.finish(result).await),
        }
    }

    /// Submit an answer for `ticket` and save the result if that completed
    /// the quiz.
    pub async fn answer(
        &self,
        session: &mut QuizSession,
        ticket: QuestionTicket,
        choice: AnswerChoice,
    ) -> QuizStep {
        let outcome = session.submit_answer(ticket, choice);
        self.after_answer(outcome).await
    }

    /// Submit the currently selected option for `ticket`.
    pub async fn answer_selected(&self, session: &mut QuizSession, ticket: QuestionTicket) -> QuizStep {
        let outcome = session.submit_selected(ticket);
        self.after_answer(outcome).await
    }

    /// Apply one countdown second.
    pub async fn tick(&self, session: &mut QuizSession, ticket: QuestionTicket) -> QuizStep {
        match session.tick(ticket) {
            TickOutcome::Ignored => QuizStep::Unchanged,
            TickOutcome::Counting { remaining_secs } => QuizStep::Counting { remaining_secs },
            TickOutcome::Expired(outcome) => {
                tracing::debug!(index = ticket.index(), "question timed out");
                self.after_answer(outcome).await
            }
        }
    }

    async fn after_answer(&self, outcome: AnswerOutcome) -> QuizStep {
        match outcome {
            AnswerOutcome::Ignored => QuizStep::Unchanged,
            AnswerOutcome::Next(ticket) => QuizStep::Question(ticket),
            AnswerOutcome::Completed(result) => self.finish(result).await,
        }
    }

    async fn finish(&self, result: SessionResult) -> QuizStep {
        let persistence = match self.results.append(&result).await {
            Ok(()) => {
                tracing::info!(
                    username = %result.username(),
                    category = %result.category(),
                    score = result.score(),
                    total = result.total_questions(),
                    "session result saved"
                );
                Persistence::Saved
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not save session result");
                Persistence::Failed(err.to_string())
            }
        };
        QuizStep::Finished {
            result,
            persistence,
        }
    }
}
