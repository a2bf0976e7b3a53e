#![forbid(unsafe_code)]

pub mod repository;
pub mod results;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, InMemoryResultSink, NewQuestionRecord, QuestionRepository, ResultSink,
    Storage, StorageError,
};
pub use results::CsvResultSink;
