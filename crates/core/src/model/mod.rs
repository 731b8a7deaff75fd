mod ids;
mod level;
mod progress;
mod question;

pub use ids::{LevelId, ParseIdError, QuestionId, SectionId};
pub use level::{Level, LevelDraft, LevelError, Section, SectionDraft};
pub use progress::{CompletionCounts, ProgressRecord};
pub use question::{Question, QuestionDraft, QuestionError, QuestionKind};
