//! Unlock eligibility for levels and sections.
//!
//! Both checks are pure and derived entirely from the completed-level set, so
//! once something is unlocked it stays unlocked until a full progress reset.

use crate::catalog::Catalog;
use crate::model::{LevelId, ProgressRecord, SectionId};

/// Level 1 is always open; level `n` opens once level `n - 1` is completed.
///
/// ```
/// # use quiz_core::model::{LevelId, ProgressRecord};
/// # use quiz_core::unlock::is_level_unlocked;
/// let mut progress = ProgressRecord::new();
/// assert!(is_level_unlocked(LevelId::new(1), &progress));
/// assert!(!is_level_unlocked(LevelId::new(2), &progress));
///
/// progress.record_completion(LevelId::new(1), 40);
/// assert!(is_level_unlocked(LevelId::new(2), &progress));
/// ```
#[must_use]
pub fn is_level_unlocked(level: LevelId, progress: &ProgressRecord) -> bool {
    match level.previous() {
        None => true,
        Some(previous) => progress.has_completed(previous),
    }
}

/// Section 1 is always open; section `s` opens once every level of section
/// `s - 1` is completed.
///
/// An unknown predecessor section yields `false`.
#[must_use]
pub fn is_section_unlocked(
    section: SectionId,
    progress: &ProgressRecord,
    catalog: &dyn Catalog,
) -> bool {
    let Some(previous) = section.previous() else {
        return true;
    };
    catalog.section(previous).is_some_and(|prev| {
        prev.levels()
            .iter()
            .all(|level| progress.has_completed(*level))
    })
}
