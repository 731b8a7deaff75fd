use std::sync::Arc;

use quiz_core::model::{LevelId, ProgressRecord};
use storage::records::{decode_progress, encode_progress};
use storage::repository::KeyValueStore;

/// Owns the learner's `ProgressRecord` and persists it after every mutation.
///
/// Loading never fails: unreadable or corrupted state is replaced by an empty
/// record. Write failures are logged and the in-memory record stays
/// authoritative for the rest of the run.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    record: ProgressRecord,
    loaded: bool,
}

impl ProgressStore {
    /// Create an unloaded store holding empty defaults.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            record: ProgressRecord::default(),
            loaded: false,
        }
    }

    /// Create a store and load its record from storage.
    pub async fn load(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self::new(kv, key);
        store.reload().await;
        store
    }

    /// Replace the in-memory record with the persisted one.
    pub async fn reload(&mut self) {
        self.record = match self.kv.read(&self.key).await {
            Ok(Some(text)) => decode_progress(&text).unwrap_or_else(|err| {
                tracing::warn!(key = %self.key, error = %err, "corrupted progress, starting fresh");
                ProgressRecord::default()
            }),
            Ok(None) => ProgressRecord::default(),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "progress unreadable, starting fresh"
                );
                ProgressRecord::default()
            }
        };
        self.loaded = true;
        tracing::debug!(
            key = %self.key,
            completed = self.record.completed_levels().len(),
            score = self.record.total_score(),
            "progress loaded"
        );
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mark `level` completed and add `score_delta`, even on replay.
    ///
    /// Returns `true` if the level had not been completed before.
    pub async fn complete_level(&mut self, level: LevelId, score_delta: u32) -> bool {
        let newly_completed = self.record.record_completion(level, score_delta);
        tracing::debug!(
            %level,
            score_delta,
            newly_completed,
            total_score = self.record.total_score(),
            "level completed"
        );
        self.persist().await;
        newly_completed
    }

    /// Returns `true` if the badge was not held before. Only new badges are persisted.
    pub async fn add_badge(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if !self.record.add_badge(name.clone()) {
            return false;
        }
        tracing::debug!(badge = %name, "badge added");
        self.persist().await;
        true
    }

    pub async fn reset(&mut self) {
        self.record.reset();
        tracing::debug!(key = %self.key, "progress reset");
        self.persist().await;
    }

    async fn persist(&self) {
        let text = match encode_progress(&self.record) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to encode progress");
                return;
            }
        };
        if let Err(err) = self.kv.write(&self.key, &text).await {
            tracing::warn!(key = %self.key, error = %err, "failed to persist progress");
        }
    }
}
