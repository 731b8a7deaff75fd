mod completions;
mod progress;

pub use completions::CompletionStore;
pub use progress::ProgressStore;
