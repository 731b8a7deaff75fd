use quiz_core::model::LevelId;
use quiz_core::{FeedbackEvent, GradedAnswer, LevelOutcome, LevelSession, SessionStep};

use crate::engine::{CompletionReport, QuizEngine};
use crate::error::EngineError;

/// Everything recorded when a play-through reaches its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelResult {
    pub outcome: LevelOutcome,
    pub report: CompletionReport,
    pub completion_count: u32,
}

/// Result of continuing past a graded question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayStep {
    NextQuestion { index: usize },
    Finished(LevelResult),
}

/// Level play: wraps `LevelSession` transitions with feedback cues and
/// persists the outcome once the last question is continued past.
impl QuizEngine {
    /// Open an unlocked level in its learning phase.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownLevel` or `EngineError::LevelLocked`.
    pub fn start_level(&self, level: LevelId) -> Result<LevelSession, EngineError> {
        self.ensure_playable(level)?;
        let level = self
            .catalog
            .level(level)
            .cloned()
            .ok_or(EngineError::UnknownLevel(level))?;
        tracing::debug!(level = %level.id(), questions = level.question_count(), "level started");
        Ok(LevelSession::new(level, self.scoring))
    }

    /// # Errors
    ///
    /// Returns `EngineError::Session` unless the session is still learning.
    pub fn begin_quiz(&self, session: &mut LevelSession) -> Result<(), EngineError> {
        session.begin_quiz()?;
        self.feedback.notify(FeedbackEvent::UiClick);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EngineError::Session` outside the answering phase or for an
    /// out-of-range option.
    pub fn select_option(
        &self,
        session: &mut LevelSession,
        option: usize,
    ) -> Result<(), EngineError> {
        session.select_option(option)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EngineError::Session` if nothing is selected or the session
    /// is not answering.
    pub fn submit_answer(&self, session: &mut LevelSession) -> Result<GradedAnswer, EngineError> {
        let graded = session.submit()?;
        self.feedback.notify(if graded.is_correct {
            FeedbackEvent::CorrectAnswer
        } else {
            FeedbackEvent::WrongAnswer
        });
        Ok(graded)
    }

    /// Move past a graded question. After the last one the outcome is
    /// recorded and the session should be dropped.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Session` unless the current question is graded.
    pub async fn continue_quiz(
        &mut self,
        session: &mut LevelSession,
    ) -> Result<PlayStep, EngineError> {
        let step = session.continue_quiz()?;
        self.feedback.notify(FeedbackEvent::UiClick);
        match step {
            SessionStep::NextQuestion { index } => Ok(PlayStep::NextQuestion { index }),
            SessionStep::Finished(outcome) => {
                let result = self.record_outcome(outcome).await?;
                Ok(PlayStep::Finished(result))
            }
        }
    }

    /// Leave a level without finishing it. Nothing is recorded.
    pub fn abandon_level(&self, session: LevelSession) {
        tracing::debug!(
            level = %session.level_id(),
            answered = session.answered_count(),
            "level abandoned"
        );
    }

    async fn record_outcome(&mut self, outcome: LevelOutcome) -> Result<LevelResult, EngineError> {
        // A failed attempt still completes the level, at the lower rate.
        let report = match self
            .complete_level(outcome.level_id, outcome.score_delta)
            .await
        {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(
                    level = %outcome.level_id,
                    score_delta = outcome.score_delta,
                    error = %err,
                    "level outcome discarded"
                );
                return Err(err);
            }
        };
        let completion_count = if outcome.passed {
            self.increment_completion(outcome.level_id).await?
        } else {
            self.completion_count(outcome.level_id)
        };

        tracing::info!(
            level = %outcome.level_id,
            correct = outcome.correct,
            total = outcome.total,
            passed = outcome.passed,
            score_delta = outcome.score_delta,
            "level finished"
        );
        self.feedback.notify(FeedbackEvent::LevelComplete);
        if report.unlocked_anything() {
            self.feedback.notify(FeedbackEvent::Unlock);
        }

        Ok(LevelResult {
            outcome,
            report,
            completion_count,
        })
    }
}
