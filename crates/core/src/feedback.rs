/// Cue raised at a state transition for the audio/visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackEvent {
    CorrectAnswer,
    WrongAnswer,
    LevelComplete,
    UiClick,
    Unlock,
}

/// Fire-and-forget receiver for feedback cues. The engine never waits on it.
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, event: FeedbackEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {
    fn notify(&self, _event: FeedbackEvent) {}
}
