mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{
    AnswerOutcome, QuestionTicket, QuizSession, SessionPhase, StartOutcome, TickOutcome,
};
pub use view::{ScoreHistoryService, ScoreListItem};
pub use workflow::{Persistence, QuizLoopService, QuizStep};
