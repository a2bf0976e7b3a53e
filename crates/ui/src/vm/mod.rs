mod quiz_vm;
mod score_vm;
mod time_fmt;

pub use quiz_vm::{
    CompletedVm, OptionVm, QuestionVm, QuizIntent, QuizScreen, QuizVm, SetupVm,
};
pub use score_vm::{ScoreRowVm, map_score_rows};
pub use time_fmt::format_remaining;
