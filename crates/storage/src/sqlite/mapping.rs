use quiz_core::model::{Category, OptionIndex, Question, QuestionId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    u64::try_from(v)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization("question id sign overflow".into()))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let options = [
        row.try_get::<String, _>("option1").map_err(ser)?,
        row.try_get::<String, _>("option2").map_err(ser)?,
        row.try_get::<String, _>("option3").map_err(ser)?,
        row.try_get::<String, _>("option4").map_err(ser)?,
    ];
    let correct = OptionIndex::new(row.try_get::<i64, _>("correct_option").map_err(ser)?)
        .map_err(|e| StorageError::Serialization(format!("question {id}: {e}")))?;
    let category = Category::new(row.try_get::<String, _>("category").map_err(ser)?).map_err(ser)?;

    Question::new(
        id,
        row.try_get::<String, _>("question").map_err(ser)?,
        options,
        correct,
        category,
    )
    .map_err(|e| StorageError::Serialization(format!("question {id}: {e}")))
}
