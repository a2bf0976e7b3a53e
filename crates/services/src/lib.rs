#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sessions;

pub use app_services::AppServices;
pub use error::{AppServicesError, SessionError};

pub use sessions::{
    AnswerOutcome, Persistence, QuestionTicket, QuizLoopService, QuizProgress, QuizSession,
    QuizStep, ScoreHistoryService, ScoreListItem, SessionPhase, StartOutcome, TickOutcome,
};
