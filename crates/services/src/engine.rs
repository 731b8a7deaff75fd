use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::badges::newly_earned;
use quiz_core::model::{LevelId, ProgressRecord, SectionId};
use quiz_core::unlock::{is_level_unlocked, is_section_unlocked};
use quiz_core::{Catalog, FeedbackSink, NoopFeedback, ScoringRules};
use storage::repository::Storage;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::stores::{CompletionStore, ProgressStore};

/// Completion state of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    pub section_id: SectionId,
    pub completed: usize,
    pub total: usize,
}

impl SectionProgress {
    /// Completed share in percent, rounded to the nearest integer.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage(self.completed, self.total)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// What changed when a level was recorded as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub level_id: LevelId,
    pub newly_completed: bool,
    pub total_score: u32,
    pub new_badges: Vec<String>,
    pub unlocked_level: Option<LevelId>,
    pub unlocked_sections: Vec<SectionId>,
}

impl CompletionReport {
    #[must_use]
    pub fn unlocked_anything(&self) -> bool {
        self.unlocked_level.is_some() || !self.unlocked_sections.is_empty()
    }
}

/// Top-level controller owning both persisted stores.
///
/// The presentation layer reads state through the accessors and drives
/// changes through the action methods; nothing here renders or calls back.
pub struct QuizEngine {
    pub(crate) catalog: Arc<dyn Catalog>,
    pub(crate) feedback: Arc<dyn FeedbackSink>,
    pub(crate) progress: ProgressStore,
    pub(crate) completions: CompletionStore,
    pub(crate) scoring: ScoringRules,
    grand_badge: String,
}

impl QuizEngine {
    /// Open the engine on the `SQLite` database named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Sqlite` if the database cannot be opened or migrated.
    pub async fn open(
        config: &EngineConfig,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self, EngineError> {
        let storage = Storage::sqlite(config.db_url()).await?;
        Ok(Self::load(&storage, config, catalog).await)
    }

    /// Open the engine using settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` for invalid settings, or
    /// `EngineError::Sqlite` if the database cannot be opened.
    pub async fn open_from_env(catalog: Arc<dyn Catalog>) -> Result<Self, EngineError> {
        let config = EngineConfig::from_env()?;
        Self::open(&config, catalog).await
    }

    /// Load both stores from `storage`. Never fails; bad state starts fresh.
    pub async fn load(storage: &Storage, config: &EngineConfig, catalog: Arc<dyn Catalog>) -> Self {
        let progress = ProgressStore::load(Arc::clone(&storage.kv), config.progress_key()).await;
        let completions =
            CompletionStore::load(Arc::clone(&storage.kv), config.completions_key()).await;
        tracing::info!(
            namespace = config.namespace(),
            levels = catalog.level_count(),
            completed = progress.record().completed_levels().len(),
            "quiz engine ready"
        );
        Self {
            catalog,
            feedback: Arc::new(NoopFeedback),
            progress,
            completions,
            scoring: config.scoring(),
            grand_badge: config.grand_badge().to_owned(),
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    //
    // ─── READ ACCESSORS ────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn progress(&self) -> &ProgressRecord {
        self.progress.record()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.progress.is_loaded() && self.completions.is_loaded()
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn is_level_unlocked(&self, level: LevelId) -> bool {
        is_level_unlocked(level, self.progress.record())
    }

    #[must_use]
    pub fn is_level_completed(&self, level: LevelId) -> bool {
        self.progress.record().has_completed(level)
    }

    #[must_use]
    pub fn is_section_unlocked(&self, section: SectionId) -> bool {
        is_section_unlocked(section, self.progress.record(), self.catalog.as_ref())
    }

    /// Share of catalog levels completed, in percent.
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        let record = self.progress.record();
        let completed = self
            .catalog
            .levels()
            .iter()
            .filter(|level| record.has_completed(level.id()))
            .count();
        percentage(completed, self.catalog.level_count())
    }

    /// # Errors
    ///
    /// Returns `EngineError::UnknownSection` if the catalog has no such section.
    pub fn section_progress(&self, section: SectionId) -> Result<SectionProgress, EngineError> {
        let found = self
            .catalog
            .section(section)
            .ok_or(EngineError::UnknownSection(section))?;
        let record = self.progress.record();
        Ok(SectionProgress {
            section_id: section,
            completed: found
                .levels()
                .iter()
                .filter(|level| record.has_completed(**level))
                .count(),
            total: found.levels().len(),
        })
    }

    #[must_use]
    pub fn completion_count(&self, level: LevelId) -> u32 {
        self.completions.get(level)
    }

    //
    // ─── ACTIONS ───────────────────────────────────────────────────────────────
    //

    /// Record `level` as completed with `score_delta`, then award any badges
    /// the new completed set qualifies for.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownLevel` for ids outside the catalog and
    /// `EngineError::LevelLocked` for levels not yet unlocked.
    pub async fn complete_level(
        &mut self,
        level: LevelId,
        score_delta: u32,
    ) -> Result<CompletionReport, EngineError> {
        self.ensure_playable(level)?;

        let sections_before = self.unlocked_sections();
        let newly_completed = self.progress.complete_level(level, score_delta).await;

        let mut new_badges = Vec::new();
        for badge in newly_earned(self.progress.record(), self.catalog.as_ref(), &self.grand_badge)
        {
            if self.progress.add_badge(badge.clone()).await {
                tracing::info!(badge = %badge, "badge earned");
                new_badges.push(badge);
            }
        }

        let next = level.next();
        let unlocked_level =
            (newly_completed && self.catalog.level(next).is_some()).then_some(next);
        let unlocked_sections = self
            .unlocked_sections()
            .difference(&sections_before)
            .copied()
            .collect();

        Ok(CompletionReport {
            level_id: level,
            newly_completed,
            total_score: self.progress.record().total_score(),
            new_badges,
            unlocked_level,
            unlocked_sections,
        })
    }

    /// Returns `true` if the badge was not held before.
    pub async fn add_badge(&mut self, name: impl Into<String>) -> bool {
        self.progress.add_badge(name).await
    }

    /// Wipe progress and completion counters back to first-run defaults.
    pub async fn reset_progress(&mut self) {
        self.progress.reset().await;
        self.completions.reset().await;
        tracing::info!("progress reset");
    }

    /// Count one more passed play-through of `level`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownLevel` for ids outside the catalog.
    pub async fn increment_completion(&mut self, level: LevelId) -> Result<u32, EngineError> {
        if self.catalog.level(level).is_none() {
            return Err(EngineError::UnknownLevel(level));
        }
        Ok(self.completions.increment(level).await)
    }

    pub(crate) fn ensure_playable(&self, level: LevelId) -> Result<(), EngineError> {
        if self.catalog.level(level).is_none() {
            return Err(EngineError::UnknownLevel(level));
        }
        if !self.is_level_unlocked(level) {
            return Err(EngineError::LevelLocked(level));
        }
        Ok(())
    }

    fn unlocked_sections(&self) -> BTreeSet<SectionId> {
        self.catalog
            .sections()
            .iter()
            .map(quiz_core::model::Section::id)
            .filter(|id| self.is_section_unlocked(*id))
            .collect()
    }
}

fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (completed.min(total) * 100 + total / 2) / total;
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn section_progress_reports_completion() {
        let progress = SectionProgress {
            section_id: SectionId::new(1),
            completed: 2,
            total: 2,
        };
        assert!(progress.is_complete());
        assert_eq!(progress.percentage(), 100);
    }
}
