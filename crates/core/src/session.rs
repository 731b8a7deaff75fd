use std::fmt;

use thiserror::Error;

use crate::model::{Level, LevelId, Question};
use crate::scoring::{ScoringRules, is_pass};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A rejected learner action. The session is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error("no option selected")]
    NoSelection,

    #[error("option {option} is out of range for {len} options")]
    OptionOutOfRange { option: usize, len: usize },

    #[error("level has not reached its outcome yet")]
    NotFinished,
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a play-through currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Showing the level's learning material.
    Learning,
    /// Waiting for an answer to question `index`.
    Answering { index: usize },
    /// Question `index` has been graded and its result is visible.
    Graded { index: usize, correct: bool },
    /// Every question has been answered.
    Outcome,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Learning => write!(f, "learning"),
            SessionPhase::Answering { index } => write!(f, "answering question {index}"),
            SessionPhase::Graded { index, .. } => write!(f, "reviewing question {index}"),
            SessionPhase::Outcome => write!(f, "finished"),
        }
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// What the learner sees after submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_index: usize,
    pub chosen: usize,
    pub correct_option: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Final result of a play-through, the only part of a session that is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub level_id: LevelId,
    pub correct: u32,
    pub total: u32,
    pub passed: bool,
    pub score_delta: u32,
}

/// Result of continuing past a graded question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    NextQuestion { index: usize },
    Finished(LevelOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a level.
///
/// Moves `Learning -> Answering(0) -> Graded(0) -> Answering(1) -> ... -> Outcome`.
/// Dropping the session before `Outcome` records nothing.
#[derive(Debug, Clone)]
pub struct LevelSession {
    level: Level,
    rules: ScoringRules,
    phase: SessionPhase,
    selected: Option<usize>,
    correct_count: u32,
}

impl LevelSession {
    #[must_use]
    pub fn new(level: Level, rules: ScoringRules) -> Self {
        Self {
            level,
            rules,
            phase: SessionPhase::Learning,
            selected: None,
            correct_count: 0,
        }
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level.id()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.level.question_count()
    }

    /// Questions already graded, including the one currently on screen.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        match self.phase {
            SessionPhase::Learning => 0,
            SessionPhase::Answering { index } => index,
            SessionPhase::Graded { index, .. } => index + 1,
            SessionPhase::Outcome => self.question_count(),
        }
    }

    #[must_use]
    pub fn is_graded(&self) -> bool {
        matches!(self.phase, SessionPhase::Graded { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Outcome
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::Answering { index } | SessionPhase::Graded { index, .. } => {
                self.level.questions().get(index)
            }
            SessionPhase::Learning | SessionPhase::Outcome => None,
        }
    }

    /// Leave the learning material and show the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is in `Learning`.
    pub fn begin_quiz(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Learning {
            return Err(self.invalid("begin the quiz"));
        }
        self.phase = SessionPhase::Answering { index: 0 };
        self.selected = None;
        Ok(())
    }

    /// Choose an option for the current question. May be changed until submitted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Answering`, or
    /// `SessionError::OptionOutOfRange` for an index past the last option.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        let SessionPhase::Answering { .. } = self.phase else {
            return Err(self.invalid("select an option"));
        };
        let len = self.current_question().map_or(0, Question::option_count);
        if option >= len {
            return Err(SessionError::OptionOutOfRange { option, len });
        }
        self.selected = Some(option);
        Ok(())
    }

    /// Grade the selected option.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if nothing is selected, or
    /// `SessionError::InvalidTransition` outside `Answering`.
    pub fn submit(&mut self) -> Result<GradedAnswer, SessionError> {
        let SessionPhase::Answering { index } = self.phase else {
            return Err(self.invalid("submit an answer"));
        };
        let chosen = self.selected.ok_or(SessionError::NoSelection)?;
        let Some(question) = self.level.questions().get(index) else {
            return Err(self.invalid("submit an answer"));
        };

        let is_correct = question.is_correct(chosen);
        let graded = GradedAnswer {
            question_index: index,
            chosen,
            correct_option: question.correct_answer(),
            is_correct,
            explanation: question.explanation().map(str::to_owned),
        };

        if is_correct {
            self.correct_count += 1;
        }
        self.phase = SessionPhase::Graded {
            index,
            correct: is_correct,
        };
        Ok(graded)
    }

    /// Move past a graded question, to the next one or to the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the current question is graded.
    pub fn continue_quiz(&mut self) -> Result<SessionStep, SessionError> {
        let SessionPhase::Graded { index, .. } = self.phase else {
            return Err(self.invalid("continue"));
        };
        self.selected = None;

        let next = index + 1;
        if next < self.question_count() {
            self.phase = SessionPhase::Answering { index: next };
            return Ok(SessionStep::NextQuestion { index: next });
        }

        self.phase = SessionPhase::Outcome;
        self.outcome()
            .map(SessionStep::Finished)
            .ok_or(SessionError::NotFinished)
    }

    /// The level result once the session has reached `Outcome`.
    #[must_use]
    pub fn outcome(&self) -> Option<LevelOutcome> {
        if !self.is_finished() {
            return None;
        }
        let total = u32::try_from(self.question_count()).unwrap_or(u32::MAX);
        let passed = is_pass(self.correct_count, total);
        Some(LevelOutcome {
            level_id: self.level.id(),
            correct: self.correct_count,
            total,
            passed,
            score_delta: self.rules.score(self.correct_count, passed),
        })
    }

    /// Consume a finished session, yielding its outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` if the session has not reached `Outcome`.
    pub fn into_outcome(self) -> Result<LevelOutcome, SessionError> {
        self.outcome().ok_or(SessionError::NotFinished)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
