use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LevelId, SectionId};
use crate::model::question::{Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level {id} has no questions")]
    NoQuestions { id: LevelId },

    #[error("level {id} has an empty title")]
    EmptyTitle { id: LevelId },

    #[error("section {id} has an empty name")]
    EmptySectionName { id: SectionId },

    #[error("section {id} has an empty badge name")]
    EmptyBadge { id: SectionId },

    #[error("section {id} contains no levels")]
    EmptySection { id: SectionId },

    #[error("level {level}: {source}")]
    Question {
        level: LevelId,
        #[source]
        source: QuestionError,
    },
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated level as it appears in catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDraft {
    pub id: LevelId,
    pub title: String,
    pub section_id: SectionId,
    #[serde(default)]
    pub material: Option<String>,
    pub questions: Vec<QuestionDraft>,
}

impl LevelDraft {
    /// Validate the draft and every question in it.
    ///
    /// # Errors
    ///
    /// Returns `LevelError` if the title is blank, the level has no
    /// questions, or any question fails validation.
    pub fn validate(self) -> Result<Level, LevelError> {
        let id = self.id;
        if self.title.trim().is_empty() {
            return Err(LevelError::EmptyTitle { id });
        }
        if self.questions.is_empty() {
            return Err(LevelError::NoQuestions { id });
        }
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| LevelError::Question { level: id, source })?;

        Ok(Level {
            id,
            title: self.title,
            section_id: self.section_id,
            material: self.material,
            questions,
        })
    }
}

/// A playable level. Always holds at least one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    id: LevelId,
    title: String,
    section_id: SectionId,
    material: Option<String>,
    questions: Vec<Question>,
}

impl Level {
    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    /// Learning material shown before the quiz starts.
    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Unvalidated section as it appears in catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub id: SectionId,
    pub name: String,
    pub levels: Vec<LevelId>,
    pub badge: String,
}

impl SectionDraft {
    /// # Errors
    ///
    /// Returns `LevelError` if the name or badge is blank or no levels are listed.
    pub fn validate(self) -> Result<Section, LevelError> {
        let id = self.id;
        if self.name.trim().is_empty() {
            return Err(LevelError::EmptySectionName { id });
        }
        if self.badge.trim().is_empty() {
            return Err(LevelError::EmptyBadge { id });
        }
        if self.levels.is_empty() {
            return Err(LevelError::EmptySection { id });
        }
        Ok(Section {
            id,
            name: self.name,
            levels: self.levels,
            badge: self.badge,
        })
    }
}

/// An ordered group of levels sharing a theme and a completion badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    name: String,
    levels: Vec<LevelId>,
    badge: String,
}

impl Section {
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn levels(&self) -> &[LevelId] {
        &self.levels
    }

    #[must_use]
    pub fn badge(&self) -> &str {
        &self.badge
    }
}
