use std::sync::Arc;

use quiz_core::model::{CompletionCounts, LevelId};
use storage::records::{decode_completions, encode_completions};
use storage::repository::KeyValueStore;

/// Per-level counters of passed play-throughs, persisted on every change.
pub struct CompletionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    counts: CompletionCounts,
    loaded: bool,
}

impl CompletionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            counts: CompletionCounts::default(),
            loaded: false,
        }
    }

    /// Create a store and load its counters; failures yield an empty mapping.
    pub async fn load(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self::new(kv, key);
        store.counts = match store.kv.read(&store.key).await {
            Ok(Some(text)) => decode_completions(&text).unwrap_or_else(|err| {
                tracing::warn!(
                    key = %store.key,
                    error = %err,
                    "corrupted counters, starting fresh"
                );
                CompletionCounts::default()
            }),
            Ok(None) => CompletionCounts::default(),
            Err(err) => {
                tracing::warn!(
                    key = %store.key,
                    error = %err,
                    "counters unreadable, starting fresh"
                );
                CompletionCounts::default()
            }
        };
        store.loaded = true;
        store
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn counts(&self) -> &CompletionCounts {
        &self.counts
    }

    #[must_use]
    pub fn get(&self, level: LevelId) -> u32 {
        self.counts.get(level)
    }

    /// Returns the new count for `level`.
    pub async fn increment(&mut self, level: LevelId) -> u32 {
        let count = self.counts.increment(level);
        tracing::debug!(%level, count, "completion counted");
        self.persist().await;
        count
    }

    pub async fn reset(&mut self) {
        self.counts.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        let result = match encode_completions(&self.counts) {
            Ok(text) => self.kv.write(&self.key, &text).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            tracing::warn!(key = %self.key, error = %err, "failed to persist completion counters");
        }
    }
}
