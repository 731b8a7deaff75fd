#![forbid(unsafe_code)]

pub mod badges;
pub mod catalog;
pub mod feedback;
pub mod model;
pub mod scoring;
pub mod session;
pub mod unlock;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use feedback::{FeedbackEvent, FeedbackSink, NoopFeedback};
pub use scoring::ScoringRules;
pub use session::{
    GradedAnswer, LevelOutcome, LevelSession, SessionError, SessionPhase, SessionStep,
};
