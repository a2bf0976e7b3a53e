use quiz_core::model::{Category, OptionIndex};

use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

const SAMPLES: [(&str, [&str; 4], i64, &str); 3] = [
    (
        "What is the capital of France?",
        ["Berlin", "Madrid", "Paris", "Rome"],
        3,
        "Geography",
    ),
    (
        "Who developed Python?",
        ["Ryan Gosling", "Guido van Rossum", "Brendan Eich", "Bjarne Stroustrup"],
        2,
        "Technology",
    ),
    (
        "What is the largest planet in our solar system?",
        ["Earth", "Mars", "Jupiter", "Saturn"],
        3,
        "Science",
    ),
];

/// The starter question set inserted into a fresh database.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if a built-in sample is malformed.
pub fn sample_questions() -> Result<Vec<NewQuestionRecord>, StorageError> {
    SAMPLES
        .iter()
        .map(|(prompt, options, correct, category)| {
            Ok(NewQuestionRecord {
                prompt: (*prompt).to_owned(),
                options: options.map(String::from),
                correct: OptionIndex::new(*correct)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?,
                category: Category::new(*category)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?,
            })
        })
        .collect()
}

/// Insert the sample questions only when the store is empty. Returns the
/// number of rows inserted.
///
/// # Errors
///
/// Returns `StorageError` if counting or inserting fails.
pub async fn seed_sample_questions(repo: &dyn QuestionRepository) -> Result<usize, StorageError> {
    if repo.count_questions().await? > 0 {
        return Ok(0);
    }

    let samples = sample_questions()?;
    let inserted = samples.len();
    for record in samples {
        repo.insert_question(record).await?;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[tokio::test]
    async fn seeds_only_an_empty_store() {
        let repo = InMemoryRepository::new();
        assert_eq!(seed_sample_questions(&repo).await.unwrap(), 3);
        assert_eq!(seed_sample_questions(&repo).await.unwrap(), 0);
        assert_eq!(repo.count_questions().await.unwrap(), 3);
    }
}
