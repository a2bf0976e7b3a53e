use std::fmt;

use quiz_core::model::{
    AnswerChoice, Category, Question, SessionConfig, SessionResult, TimeLimit, Username,
};

use super::progress::QuizProgress;
use crate::error::SessionError;

//
// ─── PUBLIC STATE TYPES ────────────────────────────────────────────────────────
//

/// Which screen the quiz is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingName,
    AwaitingSetup,
    InQuestion,
    Completed,
}

/// Identifies one question of one attempt.
///
/// Every answer and countdown tick carries the ticket of the question it was
/// meant for. Once the session has moved on, that ticket no longer matches and
/// the event is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuestionTicket {
    attempt: u64,
    index: usize,
}

impl QuestionTicket {
    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Result of committing the setup screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Ready(QuestionTicket),
    /// The category had no questions; the attempt finished at 0 of 0.
    Empty(SessionResult),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Late or duplicate submission; nothing changed.
    Ignored,
    Next(QuestionTicket),
    Completed(SessionResult),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Counting { remaining_secs: u32 },
    /// The countdown had already hit zero; the question was submitted unanswered.
    Expired(AnswerOutcome),
}

//
// ─── INTERNAL STATE ────────────────────────────────────────────────────────────
//

#[derive(Clone)]
struct Attempt {
    number: u64,
    config: SessionConfig,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    remaining_secs: u32,
    selected: AnswerChoice,
}

impl Attempt {
    fn ticket(&self) -> QuestionTicket {
        QuestionTicket {
            attempt: self.number,
            index: self.index,
        }
    }

    fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    fn snapshot(&self) -> SessionResult {
        SessionResult::from_counts(
            self.config.username().clone(),
            self.config.category().clone(),
            self.score,
            self.total(),
        )
    }

    fn load_next(&mut self) {
        self.remaining_secs = self.config.time_limit().secs();
        self.selected = AnswerChoice::Unset;
    }
}

#[derive(Clone)]
enum State {
    AwaitingName,
    AwaitingSetup { username: Username },
    InQuestion(Attempt),
    Completed { attempt: Attempt, result: SessionResult },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The quiz state machine: name entry, setup, one question at a time with a
/// countdown, then a final score.
///
/// It owns all mutable quiz state and processes one event at a time. Loading
/// questions and saving results happen outside (see `QuizLoopService`).
#[derive(Clone)]
pub struct QuizSession {
    state: State,
    attempts: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::AwaitingName,
            attempts: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::AwaitingName => SessionPhase::AwaitingName,
            State::AwaitingSetup { .. } => SessionPhase::AwaitingSetup,
            State::InQuestion(_) => SessionPhase::InQuestion,
            State::Completed { .. } => SessionPhase::Completed,
        }
    }

    fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            State::InQuestion(attempt) | State::Completed { attempt, .. } => Some(attempt),
            State::AwaitingName | State::AwaitingSetup { .. } => None,
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        match &self.state {
            State::AwaitingName => None,
            State::AwaitingSetup { username } => Some(username),
            State::InQuestion(attempt) | State::Completed { attempt, .. } => {
                Some(attempt.config.username())
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.attempt().map(|attempt| &attempt.config)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.attempt().map_or(0, |attempt| attempt.score)
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.questions.len())
    }

    /// Seconds left on the active question; `None` outside `InQuestion`.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match &self.state {
            State::InQuestion(attempt) => Some(attempt.remaining_secs),
            _ => None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> AnswerChoice {
        match &self.state {
            State::InQuestion(attempt) => attempt.selected,
            _ => AnswerChoice::Unset,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::InQuestion(attempt) => attempt.questions.get(attempt.index),
            _ => None,
        }
    }

    #[must_use]
    pub fn ticket(&self) -> Option<QuestionTicket> {
        match &self.state {
            State::InQuestion(attempt) => Some(attempt.ticket()),
            _ => None,
        }
    }

    /// The finished-session snapshot, once `Completed`.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        match &self.state {
            State::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            index: self.question_index(),
            total: self.total_questions(),
            score: self.score(),
            remaining_secs: self.remaining_secs(),
            is_complete: self.phase() == SessionPhase::Completed,
        }
    }

    /// Accept the player's name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` for a blank name (state unchanged), or
    /// `SessionError::InvalidTransition` outside `AwaitingName`.
    pub fn submit_name(&mut self, raw: &str) -> Result<(), SessionError> {
        if !matches!(self.state, State::AwaitingName) {
            return Err(self.invalid("submit a name"));
        }
        let username = Username::parse(raw)?;
        tracing::debug!(%username, "name accepted");
        self.state = State::AwaitingSetup { username };
        Ok(())
    }

    /// Commit the setup screen with the questions already loaded for
    /// `category`. Also starts a new attempt from `Completed`, keeping the name.
    ///
    /// The time limit text is parsed leniently: non-numeric input becomes the
    /// default, numbers are clamped into range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` from `AwaitingName` or
    /// `InQuestion`.
    pub fn begin(
        &mut self,
        category: Category,
        time_limit_text: &str,
        questions: Vec<Question>,
    ) -> Result<StartOutcome, SessionError> {
        let username = match &self.state {
            State::AwaitingSetup { username } => username.clone(),
            State::Completed { attempt, .. } => attempt.config.username().clone(),
            State::AwaitingName | State::InQuestion(_) => {
                return Err(self.invalid("start a quiz"));
            }
        };

        let time_limit = TimeLimit::parse(time_limit_text);
        self.attempts += 1;
        let mut attempt = Attempt {
            number: self.attempts,
            config: SessionConfig::new(username, category, time_limit),
            questions,
            index: 0,
            score: 0,
            remaining_secs: 0,
            selected: AnswerChoice::Unset,
        };
        attempt.load_next();

        tracing::debug!(
            attempt = attempt.number,
            category = %attempt.config.category(),
            time_limit = time_limit.secs(),
            questions = attempt.questions.len(),
            "quiz started"
        );

        if attempt.questions.is_empty() {
            let result = attempt.snapshot();
            self.state = State::Completed {
                attempt,
                result: result.clone(),
            };
            return Ok(StartOutcome::Empty(result));
        }

        let ticket = attempt.ticket();
        self.state = State::InQuestion(attempt);
        Ok(StartOutcome::Ready(ticket))
    }

    /// Record the highlighted option for the current question. Returns `false`
    /// when the ticket is stale.
    pub fn select(&mut self, ticket: QuestionTicket, choice: AnswerChoice) -> bool {
        match &mut self.state {
            State::InQuestion(attempt) if attempt.ticket() == ticket => {
                attempt.selected = choice;
                true
            }
            _ => false,
        }
    }

    /// Submit whatever is currently selected.
    pub fn submit_selected(&mut self, ticket: QuestionTicket) -> AnswerOutcome {
        let choice = self.selected();
        self.submit_answer(ticket, choice)
    }

    /// Score the current question and advance.
    ///
    /// Only the first submission for a ticket counts; anything later is
    /// `AnswerOutcome::Ignored`.
    pub fn submit_answer(&mut self, ticket: QuestionTicket, choice: AnswerChoice) -> AnswerOutcome {
        let State::InQuestion(attempt) = &mut self.state else {
            return AnswerOutcome::Ignored;
        };
        if attempt.ticket() != ticket {
            return AnswerOutcome::Ignored;
        }
        let Some(question) = attempt.questions.get(attempt.index) else {
            return AnswerOutcome::Ignored;
        };

        if question.is_correct(choice) {
            attempt.score += 1;
        }
        attempt.index += 1;

        if attempt.index < attempt.questions.len() {
            attempt.load_next();
            return AnswerOutcome::Next(attempt.ticket());
        }

        let result = attempt.snapshot();
        let State::InQuestion(attempt) = std::mem::replace(&mut self.state, State::AwaitingName)
        else {
            return AnswerOutcome::Ignored;
        };
        tracing::debug!(
            attempt = attempt.number,
            score = result.score(),
            total = result.total_questions(),
            "quiz completed"
        );
        self.state = State::Completed {
            attempt,
            result: result.clone(),
        };
        AnswerOutcome::Completed(result)
    }

    /// One elapsed second on the countdown for `ticket`.
    pub fn tick(&mut self, ticket: QuestionTicket) -> TickOutcome {
        let State::InQuestion(attempt) = &mut self.state else {
            return TickOutcome::Ignored;
        };
        if attempt.ticket() != ticket {
            return TickOutcome::Ignored;
        }

        if attempt.remaining_secs > 0 {
            attempt.remaining_secs -= 1;
            return TickOutcome::Counting {
                remaining_secs: attempt.remaining_secs,
            };
        }

        TickOutcome::Expired(self.submit_answer(ticket, AnswerChoice::Unset))
    }

    /// Forget everything and go back to name entry.
    pub fn reset(&mut self) {
        self.state = State::AwaitingName;
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            phase: self.phase(),
            action,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase())
            .field("attempts", &self.attempts)
            .field("index", &self.question_index())
            .field("total", &self.total_questions())
            .field("score", &self.score())
            .field("remaining_secs", &self.remaining_secs())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
