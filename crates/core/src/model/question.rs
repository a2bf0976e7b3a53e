use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("option {index} cannot be empty")]
    EmptyOption { index: u8 },

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("option index must be between 1 and 4, got {0}")]
    OptionOutOfRange(i64),
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

/// One-based position of an answer option (1..=4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// # Errors
    ///
    /// Returns `QuestionError::OptionOutOfRange` outside 1..=4.
    pub fn new(value: i64) -> Result<Self, QuestionError> {
        match value {
            1..=4 => Ok(Self(value as u8)),
            other => Err(QuestionError::OptionOutOfRange(other)),
        }
    }

    /// All four options in display order.
    #[must_use]
    pub fn all() -> [OptionIndex; 4] {
        [Self(1), Self(2), Self(3), Self(4)]
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot into the `options` array.
    #[must_use]
    pub fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = QuestionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<OptionIndex> for u8 {
    fn from(value: OptionIndex) -> Self {
        value.0
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the player submitted for a question. `Unset` covers both "no radio
/// button picked" and a countdown running out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnswerChoice {
    #[default]
    Unset,
    Option(OptionIndex),
}

impl AnswerChoice {
    #[must_use]
    pub fn option(self) -> Option<OptionIndex> {
        match self {
            AnswerChoice::Unset => None,
            AnswerChoice::Option(index) => Some(index),
        }
    }
}

impl From<OptionIndex> for AnswerChoice {
    fn from(value: OptionIndex) -> Self {
        AnswerChoice::Option(value)
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Label partitioning the question set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyCategory` for blank labels.
    pub fn new(label: impl Into<String>) -> Result<Self, QuestionError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyCategory);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Category {
    type Error = QuestionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice trivia question with exactly four options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; 4],
    correct: OptionIndex,
    category: Category,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is blank.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: [String; 4],
        correct: OptionIndex,
        category: Category,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        for (index, option) in OptionIndex::all().iter().zip(options.iter()) {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { index: index.get() });
            }
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
            category,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.slot()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// `Unset` never matches.
    #[must_use]
    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        choice.option() == Some(self.correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
