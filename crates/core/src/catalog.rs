//! Read-only access to quiz content.
//!
//! The engine consults the catalog for level and section metadata but never
//! mutates it. `StaticCatalog` is the in-memory implementation, built either
//! from validated parts or from a JSON document.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Level, LevelDraft, LevelError, LevelId, Section, SectionDraft, SectionId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog has no levels")]
    Empty,

    #[error("level ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousLevels { expected: LevelId, found: LevelId },

    #[error("section ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousSections {
        expected: SectionId,
        found: SectionId,
    },

    #[error("section {section} lists unknown level {level}")]
    UnknownLevel { section: SectionId, level: LevelId },

    #[error("level {level} is listed by sections {first} and {second}")]
    DuplicateLevel {
        level: LevelId,
        first: SectionId,
        second: SectionId,
    },

    #[error("level {level} belongs to no section")]
    OrphanLevel { level: LevelId },

    #[error("level {level} declares section {declared} but is listed by section {listed}")]
    SectionMismatch {
        level: LevelId,
        declared: SectionId,
        listed: SectionId,
    },

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only catalog contract consumed by the engine.
pub trait Catalog: Send + Sync {
    fn level(&self, id: LevelId) -> Option<&Level>;

    fn section(&self, id: SectionId) -> Option<&Section>;

    /// Sections in catalog order.
    fn sections(&self) -> &[Section];

    /// Levels in id order.
    fn levels(&self) -> &[Level];

    fn level_count(&self) -> usize {
        self.levels().len()
    }
}

/// In-memory catalog whose structure has been checked on construction.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    levels: Vec<Level>,
    sections: Vec<Section>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    levels: Vec<LevelDraft>,
    sections: Vec<SectionDraft>,
}

impl StaticCatalog {
    /// Build a catalog, checking that levels and sections are numbered from 1
    /// and that every level belongs to exactly one section.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` describing the first structural problem found.
    pub fn new(mut levels: Vec<Level>, mut sections: Vec<Section>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        levels.sort_by_key(Level::id);
        sections.sort_by_key(Section::id);

        for (expected, level) in (1_u32..).zip(&levels) {
            if level.id().value() != expected {
                return Err(CatalogError::NonContiguousLevels {
                    expected: LevelId::new(expected),
                    found: level.id(),
                });
            }
        }
        for (expected, section) in (1_u32..).zip(&sections) {
            if section.id().value() != expected {
                return Err(CatalogError::NonContiguousSections {
                    expected: SectionId::new(expected),
                    found: section.id(),
                });
            }
        }

        let mut owner: BTreeMap<LevelId, SectionId> = BTreeMap::new();
        for section in &sections {
            for &level in section.levels() {
                let Some(found) = levels.get(index_of(level)).filter(|l| l.id() == level) else {
                    return Err(CatalogError::UnknownLevel {
                        section: section.id(),
                        level,
                    });
                };
                if found.section_id() != section.id() {
                    return Err(CatalogError::SectionMismatch {
                        level,
                        declared: found.section_id(),
                        listed: section.id(),
                    });
                }
                if let Some(first) = owner.insert(level, section.id()) {
                    return Err(CatalogError::DuplicateLevel {
                        level,
                        first,
                        second: section.id(),
                    });
                }
            }
        }
        if let Some(orphan) = levels.iter().find(|l| !owner.contains_key(&l.id())) {
            return Err(CatalogError::OrphanLevel { level: orphan.id() });
        }

        Ok(Self { levels, sections })
    }

    /// Parse and validate a catalog from JSON of the shape
    /// `{"levels": [...], "sections": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or any validation error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let levels = doc
            .levels
            .into_iter()
            .map(LevelDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        let sections = doc
            .sections
            .into_iter()
            .map(SectionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(levels, sections)
    }
}

fn index_of(level: LevelId) -> usize {
    usize::try_from(level.value().saturating_sub(1)).unwrap_or(usize::MAX)
}

impl Catalog for StaticCatalog {
    fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(index_of(id)).filter(|l| l.id() == id)
    }

    fn section(&self, id: SectionId) -> Option<&Section> {
        let index = usize::try_from(id.value().checked_sub(1)?).ok()?;
        self.sections.get(index)
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn levels(&self) -> &[Level] {
        &self.levels
    }
}
