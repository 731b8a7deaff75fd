use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::LevelId;

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Durable learner progress for one device.
///
/// `current_level`, `total_score` and `badges` only grow; the sole way to
/// shrink any of them is [`ProgressRecord::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    completed_levels: BTreeSet<LevelId>,
    current_level: LevelId,
    total_score: u32,
    badges: Vec<String>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            completed_levels: BTreeSet::new(),
            current_level: LevelId::new(1),
            total_score: 0,
            badges: Vec::new(),
        }
    }
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// Duplicate badges are dropped and a zero `current_level` is raised to 1.
    #[must_use]
    pub fn from_persisted(
        completed_levels: impl IntoIterator<Item = LevelId>,
        current_level: LevelId,
        total_score: u32,
        badges: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut record = Self {
            completed_levels: completed_levels.into_iter().collect(),
            current_level: current_level.max(LevelId::new(1)),
            total_score,
            badges: Vec::new(),
        };
        for badge in badges {
            record.add_badge(badge);
        }
        record
    }

    #[must_use]
    pub fn completed_levels(&self) -> &BTreeSet<LevelId> {
        &self.completed_levels
    }

    #[must_use]
    pub fn current_level(&self) -> LevelId {
        self.current_level
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Badges in the order they were earned.
    #[must_use]
    pub fn badges(&self) -> &[String] {
        &self.badges
    }

    #[must_use]
    pub fn has_completed(&self, level: LevelId) -> bool {
        self.completed_levels.contains(&level)
    }

    #[must_use]
    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|b| b == name)
    }

    /// Record a finished play-through of `level`.
    ///
    /// The score is added even when the level was already completed.
    /// Returns `true` if the level was not completed before.
    pub fn record_completion(&mut self, level: LevelId, score_delta: u32) -> bool {
        let newly_completed = self.completed_levels.insert(level);
        self.total_score = self.total_score.saturating_add(score_delta);
        self.current_level = self.current_level.max(level.next());
        newly_completed
    }

    /// Returns `true` if the badge was not held before.
    pub fn add_badge(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.has_badge(&name) {
            return false;
        }
        self.badges.push(name);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//
// ─── COMPLETION COUNTS ─────────────────────────────────────────────────────────
//

/// Number of passed play-throughs per level. Counters never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionCounts {
    counts: BTreeMap<LevelId, u32>,
}

impl CompletionCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate counters from persisted storage. Zero entries are dropped.
    #[must_use]
    pub fn from_persisted(entries: impl IntoIterator<Item = (LevelId, u32)>) -> Self {
        Self {
            counts: entries.into_iter().filter(|(_, count)| *count > 0).collect(),
        }
    }

    /// Returns the new count.
    pub fn increment(&mut self, level: LevelId) -> u32 {
        let count = self.counts.entry(level).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    #[must_use]
    pub fn get(&self, level: LevelId) -> u32 {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LevelId, u32)> + '_ {
        self.counts.iter().map(|(level, count)| (*level, *count))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
