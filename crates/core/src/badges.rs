//! Badge derivation from the completed-level set.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::model::{LevelId, ProgressRecord, Section};

/// Every badge the completed set qualifies for: one per fully completed
/// section, plus `grand_badge` once every level of every section is done.
///
/// Results follow section order with the grand badge last.
#[must_use]
pub fn derive_badges(
    completed: &BTreeSet<LevelId>,
    sections: &[Section],
    grand_badge: &str,
) -> Vec<String> {
    let mut earned: Vec<String> = sections
        .iter()
        .filter(|section| section.levels().iter().all(|l| completed.contains(l)))
        .map(|section| section.badge().to_owned())
        .collect();

    if !sections.is_empty() && earned.len() == sections.len() {
        earned.push(grand_badge.to_owned());
    }
    earned
}

/// Badges the learner qualifies for but does not hold yet.
#[must_use]
pub fn newly_earned(
    progress: &ProgressRecord,
    catalog: &dyn Catalog,
    grand_badge: &str,
) -> Vec<String> {
    derive_badges(progress.completed_levels(), catalog.sections(), grand_badge)
        .into_iter()
        .filter(|badge| !progress.has_badge(badge))
        .collect()
}
