use rand::rng;

use readly_core::Clock;
use readly_core::exercise::{ExerciseError, ExerciseScore, FillBlankSession};
use readly_core::model::{FillBlankQuestion, QuestionError};
use readly_core::sorting::{SortingError, SortingExercise};

/// Warm-up sentences shown on the fill-in-the-blank page.
///
/// # Errors
///
/// Returns `QuestionError` if a built-in sentence is malformed.
pub fn sample_fill_blank_questions() -> Result<Vec<FillBlankQuestion>, QuestionError> {
    Ok(vec![
        FillBlankQuestion::new(["The ", " fox jumps over the ", " dog."], ["quick", "lazy"])?,
        FillBlankQuestion::new(["I love ", " and ", "."], ["coffee", "tea"])?,
    ])
}

#[must_use]
pub fn sample_sorting_items() -> Vec<String> {
    ["First", "Second", "Third", "Fourth"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Starts standalone exercises with timestamps from the app clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct PracticeService {
    clock: Clock,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a fill-in-the-blank exercise; `on_complete` receives the final
    /// score exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::Empty` when `questions` is empty.
    pub fn start_fill_blank(
        &self,
        questions: Vec<FillBlankQuestion>,
        on_complete: impl FnOnce(ExerciseScore) + Send + 'static,
    ) -> Result<FillBlankSession, ExerciseError> {
        let total = questions.len();
        let session = FillBlankSession::new(questions, self.clock.now())?.with_completion(
            move |score| {
                tracing::info!(
                    score = score.score,
                    total = score.total_questions,
                    "fill-in-the-blank exercise completed"
                );
                on_complete(score);
            },
        );
        tracing::debug!(questions = total, "fill-in-the-blank exercise started");
        Ok(session)
    }

    /// Start a sorting exercise from a fresh shuffle.
    ///
    /// # Errors
    ///
    /// Returns `SortingError::Empty` when `items` is empty.
    pub fn start_sorting(&self, items: Vec<String>) -> Result<SortingExercise, SortingError> {
        SortingExercise::shuffled(items, &mut rng())
    }
}
