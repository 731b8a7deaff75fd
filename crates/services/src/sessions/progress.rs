use quiz_core::LevelSession;

/// Aggregated view of a level play-through, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub correct: u32,
    pub is_complete: bool,
}

impl QuizProgress {
    #[must_use]
    pub fn of(session: &LevelSession) -> Self {
        let total = session.question_count();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            correct: session.correct_count(),
            is_complete: session.is_finished(),
        }
    }
}
