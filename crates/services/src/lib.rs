#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod sessions;
pub mod stores;

pub use config::EngineConfig;
pub use engine::{CompletionReport, QuizEngine, SectionProgress};
pub use error::{ConfigError, EngineError};
pub use sessions::{LevelResult, PlayStep, QuizProgress};
pub use stores::{CompletionStore, ProgressStore};
