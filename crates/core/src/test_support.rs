use crate::catalog::StaticCatalog;
use crate::model::{
    Level, LevelDraft, LevelId, QuestionDraft, QuestionId, QuestionKind, Section, SectionDraft,
    SectionId,
};

/// Level with `questions` two-option questions; answers alternate between 0 and 1.
pub(crate) fn level_in_section(id: u32, section: u32, questions: u32) -> Level {
    LevelDraft {
        id: LevelId::new(id),
        title: format!("Level {id}"),
        section_id: SectionId::new(section),
        material: Some(format!("Material for level {id}")),
        questions: (0..questions)
            .map(|q| QuestionDraft {
                id: QuestionId::new(id * 100 + q),
                prompt: format!("Question {q} of level {id}"),
                options: vec!["first".into(), "second".into()],
                correct_answer: usize::try_from(q % 2).unwrap(),
                kind: QuestionKind::SingleChoice,
                explanation: Some(format!("Explanation {q}")),
            })
            .collect(),
    }
    .validate()
    .unwrap()
}

pub(crate) fn level_with_questions(id: u32, questions: u32) -> Level {
    level_in_section(id, 1, questions)
}

/// Catalog whose sections hold `sizes[i]` consecutive single-question levels.
pub(crate) fn catalog_with_sections(sizes: &[u32]) -> StaticCatalog {
    let mut levels = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut next = 1;
    for (index, size) in sizes.iter().enumerate() {
        let section_id = u32::try_from(index).unwrap() + 1;
        let ids: Vec<LevelId> = (next..next + size).map(LevelId::new).collect();
        for id in &ids {
            levels.push(level_in_section(id.value(), section_id, 1));
        }
        next += size;
        sections.push(
            SectionDraft {
                id: SectionId::new(section_id),
                name: format!("Section {section_id}"),
                levels: ids,
                badge: format!("Section {section_id} Badge"),
            }
            .validate()
            .unwrap(),
        );
    }
    StaticCatalog::new(levels, sections).unwrap()
}
