use quiz_core::model::{Category, Question, QuestionId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_question_row, question_id_from_i64, ser};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT DISTINCT category
            FROM questions
            ORDER BY category ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            let label: String = row.try_get("category").map_err(ser)?;
            categories.push(Category::new(label).map_err(ser)?);
        }
        Ok(categories)
    }

    async fn questions_for(&self, category: &Category) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question, option1, option2, option3, option4, correct_option, category
            FROM questions
            WHERE category = ?1
            ORDER BY id ASC
            ",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn count_questions(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        u64::try_from(count).map_err(|_| StorageError::Serialization("negative count".into()))
    }

    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError> {
        let [option1, option2, option3, option4] = record.options;
        let res = sqlx::query(
            r"
            INSERT INTO questions (question, option1, option2, option3, option4, correct_option, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(record.prompt)
        .bind(option1)
        .bind(option2)
        .bind(option3)
        .bind(option4)
        .bind(i64::from(record.correct.get()))
        .bind(record.category.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        question_id_from_i64(res.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_row_ids_are_rejected() {
        assert_eq!(question_id_from_i64(7).unwrap(), QuestionId::new(7));
        assert!(matches!(
            question_id_from_i64(-1),
            Err(StorageError::Serialization(_))
        ));
    }
}
