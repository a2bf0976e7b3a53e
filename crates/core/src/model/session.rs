use std::fmt;
use std::num::IntErrorKind;
use thiserror::Error;

use crate::model::Category;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("please enter a valid name")]
    EmptyName,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

//
// ─── USERNAME ──────────────────────────────────────────────────────────────────
//

/// Player name, trimmed and never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── TIME LIMIT ────────────────────────────────────────────────────────────────
//

/// Seconds allowed per question, always within `[MIN, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeLimit(u32);

impl TimeLimit {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 60;
    pub const DEFAULT: u32 = 10;

    /// Clamp any integer into the allowed range.
    #[must_use]
    pub fn clamped(secs: i64) -> Self {
        let clamped = secs.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u32::try_from(clamped).unwrap_or(Self::DEFAULT))
    }

    /// Parse free text from the setup screen. Non-numeric input falls back to
    /// `DEFAULT`; numeric input is clamped, including integers wider than `i64`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(secs) => Self::clamped(secs),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Self(Self::MAX),
                IntErrorKind::NegOverflow => Self(Self::MIN),
                _ => Self(Self::DEFAULT),
            },
        }
    }

    #[must_use]
    pub fn secs(self) -> u32 {
        self.0
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// Settings committed on the setup screen; fixed for the rest of the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    username: Username,
    category: Category,
    time_limit: TimeLimit,
}

impl SessionConfig {
    #[must_use]
    pub fn new(username: Username, category: Category, time_limit: TimeLimit) -> Self {
        Self {
            username,
            category,
            time_limit,
        }
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }
}

//
// ─── SESSION RESULT ────────────────────────────────────────────────────────────
//

/// Summary of one finished attempt, appended to the scores file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionResult {
    username: Username,
    score: u32,
    total_questions: u32,
    category: Category,
}

impl SessionResult {
    /// # Errors
    ///
    /// Returns `ValidationError::ScoreExceedsTotal` if `score > total_questions`.
    pub fn new(
        username: Username,
        score: u32,
        total_questions: u32,
        category: Category,
    ) -> Result<Self, ValidationError> {
        if score > total_questions {
            return Err(ValidationError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        Ok(Self {
            username,
            score,
            total_questions,
            category,
        })
    }

    /// Build a result from live counters; `score` is capped at `total_questions`.
    #[must_use]
    pub fn from_counts(
        username: Username,
        category: Category,
        score: u32,
        total_questions: u32,
    ) -> Self {
        Self {
            username,
            score: score.min(total_questions),
            total_questions,
            category,
        }
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Whole-number percentage, or `None` for a session with no questions.
    #[must_use]
    pub fn percent(&self) -> Option<u32> {
        if self.total_questions == 0 {
            return None;
        }
        u32::try_from(u64::from(self.score) * 100 / u64::from(self.total_questions)).ok()
    }
}
