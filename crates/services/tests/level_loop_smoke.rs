use std::sync::{Arc, Mutex};

use quiz_core::model::{
    LevelDraft, LevelId, QuestionDraft, QuestionId, QuestionKind, SectionDraft, SectionId,
};
use quiz_core::{Catalog, FeedbackEvent, FeedbackSink, LevelSession, StaticCatalog};
use services::{EngineConfig, EngineError, PlayStep, QuizEngine, QuizProgress};
use storage::repository::Storage;

#[derive(Default)]
struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn notify(&self, event: FeedbackEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn level(id: u32, section: u32, questions: u32) -> LevelDraft {
    LevelDraft {
        id: LevelId::new(id),
        title: format!("Level {id}"),
        section_id: SectionId::new(section),
        material: Some("Read this first.".into()),
        questions: (0..questions)
            .map(|q| QuestionDraft {
                id: QuestionId::new(id * 10 + q),
                prompt: format!("Question {q}"),
                options: vec!["right".into(), "wrong".into()],
                correct_answer: 0,
                kind: QuestionKind::SingleChoice,
                explanation: Some("Because.".into()),
            })
            .collect(),
    }
}

/// Section 1: level 1 (6 questions), level 2 (1 question). Section 2: level 3 (5 questions).
fn catalog() -> Arc<dyn Catalog> {
    let levels = [level(1, 1, 6), level(2, 1, 1), level(3, 2, 5)]
        .into_iter()
        .map(|d| d.validate().unwrap())
        .collect();
    let sections = vec![
        SectionDraft {
            id: SectionId::new(1),
            name: "Basics".into(),
            levels: vec![LevelId::new(1), LevelId::new(2)],
            badge: "Basics Badge".into(),
        }
        .validate()
        .unwrap(),
        SectionDraft {
            id: SectionId::new(2),
            name: "Ownership".into(),
            levels: vec![LevelId::new(3)],
            badge: "Ownership Badge".into(),
        }
        .validate()
        .unwrap(),
    ];
    Arc::new(StaticCatalog::new(levels, sections).unwrap())
}

async fn engine() -> (QuizEngine, Arc<RecordingFeedback>) {
    let feedback = Arc::new(RecordingFeedback::default());
    let engine = QuizEngine::load(&Storage::in_memory(), &EngineConfig::default(), catalog())
        .await
        .with_feedback(feedback.clone());
    (engine, feedback)
}

/// Play a whole level answering the first `correct` questions right.
async fn play(engine: &mut QuizEngine, level: u32, correct: usize) -> services::LevelResult {
    let mut session = engine.start_level(LevelId::new(level)).unwrap();
    engine.begin_quiz(&mut session).unwrap();
    let mut index = 0;
    loop {
        let choice = usize::from(index >= correct);
        engine.select_option(&mut session, choice).unwrap();
        engine.submit_answer(&mut session).unwrap();
        match engine.continue_quiz(&mut session).await.unwrap() {
            PlayStep::NextQuestion { index: next } => index = next,
            PlayStep::Finished(result) => return result,
        }
    }
}

#[tokio::test]
async fn passing_first_level_unlocks_second() {
    let (mut engine, _) = engine().await;
    assert!(engine.is_loaded());
    assert!(!engine.is_level_unlocked(LevelId::new(2)));

    let result = play(&mut engine, 1, 4).await;

    assert!(result.outcome.passed);
    assert_eq!(result.outcome.score_delta, 80);
    assert_eq!(result.completion_count, 1);
    assert_eq!(result.report.unlocked_level, Some(LevelId::new(2)));
    assert!(engine.is_level_unlocked(LevelId::new(2)));
    assert_eq!(engine.completion_count(LevelId::new(1)), 1);
    assert_eq!(engine.progress().total_score(), 80);
    assert_eq!(engine.progress().current_level(), LevelId::new(2));
}

#[tokio::test]
async fn failed_attempt_still_completes_but_does_not_count() {
    let (mut engine, _) = engine().await;
    let result = play(&mut engine, 1, 2).await;

    assert!(!result.outcome.passed);
    assert_eq!(result.outcome.score_delta, 30);
    assert_eq!(result.completion_count, 0);
    assert!(engine.is_level_completed(LevelId::new(1)));
    assert!(engine.is_level_unlocked(LevelId::new(2)));
    assert_eq!(engine.completion_count(LevelId::new(1)), 0);
}

#[tokio::test]
async fn replay_scores_again_without_duplicating_completion() {
    let (mut engine, _) = engine().await;
    play(&mut engine, 1, 6).await;
    let replay = play(&mut engine, 1, 3).await;

    assert!(!replay.report.newly_completed);
    assert_eq!(replay.report.unlocked_level, None);
    assert_eq!(engine.progress().completed_levels().len(), 1);
    assert_eq!(engine.progress().total_score(), 120 + 60);
    assert_eq!(engine.completion_count(LevelId::new(1)), 2);
}

#[tokio::test]
async fn locked_level_cannot_be_started() {
    let (engine, _) = engine().await;
    let err = engine.start_level(LevelId::new(3)).unwrap_err();
    assert!(matches!(err, EngineError::LevelLocked(id) if id == LevelId::new(3)));

    let err = engine.start_level(LevelId::new(99)).unwrap_err();
    assert!(matches!(err, EngineError::UnknownLevel(_)));
}

#[tokio::test]
async fn finishing_a_section_awards_badge_and_unlocks_next_section() {
    let (mut engine, feedback) = engine().await;
    play(&mut engine, 1, 6).await;
    assert!(!engine.is_section_unlocked(SectionId::new(2)));

    let result = play(&mut engine, 2, 1).await;
    assert_eq!(result.report.new_badges, ["Basics Badge"]);
    assert_eq!(result.report.unlocked_sections, [SectionId::new(2)]);
    assert!(engine.is_section_unlocked(SectionId::new(2)));
    assert!(feedback.events().contains(&FeedbackEvent::Unlock));

    let last = play(&mut engine, 3, 3).await;
    assert_eq!(last.report.new_badges, ["Ownership Badge", "Quiz Master"]);
    assert_eq!(last.report.unlocked_level, None);
    assert_eq!(
        engine.progress().badges(),
        ["Basics Badge", "Ownership Badge", "Quiz Master"]
    );
    assert_eq!(engine.progress_percentage(), 100);
}

#[tokio::test]
async fn feedback_follows_transitions() {
    let (mut engine, feedback) = engine().await;
    play(&mut engine, 1, 6).await;

    let mut expected = vec![FeedbackEvent::UiClick];
    for _ in 0..6 {
        expected.push(FeedbackEvent::CorrectAnswer);
        expected.push(FeedbackEvent::UiClick);
    }
    expected.push(FeedbackEvent::LevelComplete);
    expected.push(FeedbackEvent::Unlock);
    assert_eq!(feedback.events(), expected);
}

#[tokio::test]
async fn submit_without_selection_changes_nothing() {
    let (engine, feedback) = engine().await;
    let mut session = engine.start_level(LevelId::new(1)).unwrap();
    engine.begin_quiz(&mut session).unwrap();

    let err = engine.submit_answer(&mut session).unwrap_err();
    assert!(matches!(err, EngineError::Session(_)));
    assert_eq!(QuizProgress::of(&session).answered, 0);
    assert_eq!(feedback.events(), [FeedbackEvent::UiClick]);
}

#[tokio::test]
async fn abandoning_records_nothing() {
    let (engine, _) = engine().await;
    let mut session: LevelSession = engine.start_level(LevelId::new(1)).unwrap();
    engine.begin_quiz(&mut session).unwrap();
    engine.select_option(&mut session, 0).unwrap();
    engine.submit_answer(&mut session).unwrap();
    engine.abandon_level(session);

    assert!(!engine.is_level_completed(LevelId::new(1)));
    assert_eq!(engine.progress().total_score(), 0);
    assert_eq!(engine.completion_count(LevelId::new(1)), 0);
}

#[tokio::test]
async fn reset_relocks_everything() {
    let (mut engine, _) = engine().await;
    play(&mut engine, 1, 6).await;
    play(&mut engine, 2, 1).await;
    engine.reset_progress().await;

    assert!(engine.is_level_unlocked(LevelId::new(1)));
    assert!(!engine.is_level_unlocked(LevelId::new(2)));
    assert_eq!(engine.progress().total_score(), 0);
    assert!(engine.progress().badges().is_empty());
    assert_eq!(engine.completion_count(LevelId::new(1)), 0);
    assert_eq!(engine.progress_percentage(), 0);
}

#[tokio::test]
async fn outcome_after_reset_is_rejected() {
    let (mut engine, feedback) = engine().await;
    play(&mut engine, 1, 6).await;

    let mut session = engine.start_level(LevelId::new(2)).unwrap();
    engine.begin_quiz(&mut session).unwrap();
    engine.select_option(&mut session, 0).unwrap();
    engine.submit_answer(&mut session).unwrap();
    engine.reset_progress().await;
    let events_before = feedback.events().len();

    let err = engine.continue_quiz(&mut session).await.unwrap_err();
    assert!(matches!(err, EngineError::LevelLocked(id) if id == LevelId::new(2)));
    assert!(!engine.is_level_completed(LevelId::new(2)));
    assert_eq!(engine.progress().total_score(), 0);
    assert_eq!(engine.completion_count(LevelId::new(2)), 0);
    assert!(!feedback.events()[events_before..].contains(&FeedbackEvent::LevelComplete));
}

/// Current level, score, completed count, badge count, then one counter per level.
fn snapshot(engine: &QuizEngine) -> Vec<u64> {
    let progress = engine.progress();
    let mut values = vec![
        u64::from(progress.current_level().value()),
        u64::from(progress.total_score()),
        progress.completed_levels().len() as u64,
        progress.badges().len() as u64,
    ];
    values.extend((1..=3).map(|id| u64::from(engine.completion_count(LevelId::new(id)))));
    values
}

fn assert_not_shrunk(before: &[u64], after: &[u64], step: &str) {
    for (index, (old, new)) in before.iter().zip(after).enumerate() {
        assert!(new >= old, "{step}: value {index} went from {old} to {new}");
    }
}

#[tokio::test]
async fn mixed_actions_never_shrink_progress() {
    let (mut engine, _) = engine().await;
    let mut last = snapshot(&engine);

    play(&mut engine, 1, 2).await;
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "failed attempt");
    last = now;

    play(&mut engine, 1, 4).await;
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "passed attempt");
    last = now;

    play(&mut engine, 1, 0).await;
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "replay with no correct answers");
    last = now;

    engine.complete_level(LevelId::new(2), 10).await.unwrap();
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "direct completion");
    last = now;

    engine.add_badge("Early Bird").await;
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "manual badge");
    last = now;

    engine.increment_completion(LevelId::new(3)).await.unwrap();
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "counter bump");
    last = now;

    play(&mut engine, 3, 3).await;
    let now = snapshot(&engine);
    assert_not_shrunk(&last, &now, "last section");
    assert_eq!(now, [4, 30 + 80 + 10 + 60, 3, 4, 1, 0, 2]);

    engine.reset_progress().await;
    assert_eq!(snapshot(&engine), [1, 0, 0, 0, 0, 0, 0]);
}
