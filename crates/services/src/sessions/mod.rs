mod progress;
mod workflow;

// Public API of the level play subsystem.
pub use progress::QuizProgress;
pub use workflow::{LevelResult, PlayStep};
