//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::SessionError;
use quiz_core::model::{LevelId, SectionId};
use storage::sqlite::SqliteInitError;

/// Errors emitted while reading `EngineConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
    #[error("{name} must be a non-negative integer, got {raw:?}")]
    InvalidNumber { name: &'static str, raw: String },
}

/// Errors emitted by `QuizEngine`.
///
/// Rejected actions leave every store untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("level {0} does not exist in the catalog")]
    UnknownLevel(LevelId),
    #[error("section {0} does not exist in the catalog")]
    UnknownSection(SectionId),
    #[error("level {0} is locked")]
    LevelLocked(LevelId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err = EngineError::from(ConfigError::Empty {
            name: "QUIZ_NAMESPACE",
        });
        assert!(matches!(err, EngineError::Config(ConfigError::Empty { .. })));
        assert_eq!(err.to_string(), "QUIZ_NAMESPACE must not be empty");

        let err = EngineError::from(SessionError::NoSelection);
        assert!(matches!(err, EngineError::Session(SessionError::NoSelection)));
        assert_eq!(err.to_string(), SessionError::NoSelection.to_string());
    }

    #[test]
    fn rejections_name_the_level() {
        assert_eq!(
            EngineError::LevelLocked(LevelId::new(4)).to_string(),
            format!("level {} is locked", LevelId::new(4))
        );
    }
}
