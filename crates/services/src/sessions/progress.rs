/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the active question; equals `total` once complete.
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub remaining_secs: Option<u32>,
    pub is_complete: bool,
}

impl QuizProgress {
    /// One-based position for "Question 2 of 5" style labels.
    #[must_use]
    pub fn position(&self) -> usize {
        (self.index + 1).min(self.total)
    }
}
