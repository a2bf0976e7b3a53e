mod ids;
mod question;
mod session;

pub use ids::QuestionId;
pub use question::{AnswerChoice, Category, OptionIndex, Question, QuestionError};
pub use session::{SessionConfig, SessionResult, TimeLimit, Username, ValidationError};
