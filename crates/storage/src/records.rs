//! Self-describing JSON documents for the persisted records.
//!
//! These mirror the domain records so the store can encode and decode them
//! without leaking serialization concerns into `quiz-core`.

use std::collections::BTreeMap;

use quiz_core::model::{CompletionCounts, LevelId, ProgressRecord};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Persisted shape of a `ProgressRecord`.
///
/// Missing fields fall back to their defaults so older documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressDocument {
    pub completed_levels: Vec<LevelId>,
    pub current_level: LevelId,
    pub total_score: u32,
    pub badges: Vec<String>,
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self::from_record(&ProgressRecord::default())
    }
}

impl ProgressDocument {
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            completed_levels: record.completed_levels().iter().copied().collect(),
            current_level: record.current_level(),
            total_score: record.total_score(),
            badges: record.badges().to_vec(),
        }
    }

    #[must_use]
    pub fn into_record(self) -> ProgressRecord {
        ProgressRecord::from_persisted(
            self.completed_levels,
            self.current_level,
            self.total_score,
            self.badges,
        )
    }
}

/// Persisted shape of `CompletionCounts`: a map from level id to count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionDocument(pub BTreeMap<LevelId, u32>);

impl CompletionDocument {
    #[must_use]
    pub fn from_counts(counts: &CompletionCounts) -> Self {
        Self(counts.iter().collect())
    }

    #[must_use]
    pub fn into_counts(self) -> CompletionCounts {
        CompletionCounts::from_persisted(self.0)
    }
}

/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress(record: &ProgressRecord) -> Result<String, StorageError> {
    serde_json::to_string(&ProgressDocument::from_record(record)).map_err(ser)
}

/// # Errors
///
/// Returns `StorageError::Serialization` for malformed documents.
pub fn decode_progress(text: &str) -> Result<ProgressRecord, StorageError> {
    serde_json::from_str::<ProgressDocument>(text)
        .map(ProgressDocument::into_record)
        .map_err(ser)
}

/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_completions(counts: &CompletionCounts) -> Result<String, StorageError> {
    serde_json::to_string(&CompletionDocument::from_counts(counts)).map_err(ser)
}

/// # Errors
///
/// Returns `StorageError::Serialization` for malformed documents.
pub fn decode_completions(text: &str) -> Result<CompletionCounts, StorageError> {
    serde_json::from_str::<CompletionDocument>(text)
        .map(CompletionDocument::into_counts)
        .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_uses_camel_case_fields() {
        let mut record = ProgressRecord::new();
        record.record_completion(LevelId::new(1), 80);
        record.add_badge("Basics");

        let json = encode_progress(&record).unwrap();
        assert_eq!(
            json,
            r#"{"completedLevels":[1],"currentLevel":2,"totalScore":80,"badges":["Basics"]}"#
        );
        assert_eq!(decode_progress(&json).unwrap(), record);
    }

    #[test]
    fn partial_progress_document_fills_defaults() {
        let record = decode_progress(r#"{"totalScore":35}"#).unwrap();
        assert_eq!(record.total_score(), 35);
        assert_eq!(record.current_level(), LevelId::new(1));
        assert!(record.completed_levels().is_empty());
    }

    #[test]
    fn corrupted_progress_is_a_serialization_error() {
        let err = decode_progress("{\"completedLevels\": [1,").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn completions_encode_as_object_keyed_by_level() {
        let mut counts = CompletionCounts::new();
        counts.increment(LevelId::new(2));
        counts.increment(LevelId::new(2));
        counts.increment(LevelId::new(10));

        let json = encode_completions(&counts).unwrap();
        assert_eq!(json, r#"{"2":2,"10":1}"#);
        assert_eq!(decode_completions(&json).unwrap(), counts);
    }

    #[test]
    fn completions_reject_negative_counts() {
        assert!(decode_completions(r#"{"1":-3}"#).is_err());
    }
}
