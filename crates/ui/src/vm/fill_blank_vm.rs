use std::sync::{Arc, Mutex};

use readly_core::exercise::{
    Advance, DropZone, ExerciseError, ExercisePhase, ExerciseScore, FillBlankSession,
    MoveDescriptor,
};
use readly_core::model::FillBlankQuestion;
use services::{Clock, PracticeService};

use crate::views::ViewError;

/// The option currently being dragged and where it was picked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSource {
    pub zone: DropZone,
    pub item: String,
    /// Position in the pool; zero for blanks.
    pub index: usize,
}

impl DragSource {
    #[must_use]
    pub fn from_pool(item: impl Into<String>, index: usize) -> Self {
        Self {
            zone: DropZone::Pool,
            item: item.into(),
            index,
        }
    }

    #[must_use]
    pub fn from_blank(item: impl Into<String>, blank: usize) -> Self {
        Self {
            zone: DropZone::Blank(blank),
            item: item.into(),
            index: 0,
        }
    }

    /// The move this drag becomes when released over `destination`.
    #[must_use]
    pub fn drop_on(&self, destination: Option<DropZone>, destination_index: usize) -> MoveDescriptor {
        match destination {
            Some(zone) => MoveDescriptor::new(self.zone, zone, self.item.clone())
                .with_indices(self.index, destination_index),
            None => MoveDescriptor::dropped_outside(self.zone, self.item.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentenceSegment {
    Text(String),
    Blank {
        index: usize,
        value: Option<String>,
        /// `Some` once the question was checked.
        correct: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillBlankOutcome {
    Continue,
    Completed(ExerciseScore),
}

pub struct FillBlankVm {
    session: FillBlankSession,
    clock: Clock,
    reported: Arc<Mutex<Option<ExerciseScore>>>,
}

impl FillBlankVm {
    #[must_use]
    pub fn progress_label(&self) -> String {
        let progress = self.session.progress();
        format!("Question {} of {}", progress.position, progress.total)
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.session.score())
    }

    /// Sentence text with the blanks interleaved.
    #[must_use]
    pub fn segments(&self) -> Vec<SentenceSegment> {
        let placement = self.session.placement();
        let feedback = self.session.blank_feedback();
        let parts = self.session.current_question().sentence_parts();

        let mut segments = Vec::with_capacity(parts.len() * 2);
        for (index, part) in parts.iter().enumerate() {
            if !part.is_empty() {
                segments.push(SentenceSegment::Text(part.clone()));
            }
            if index + 1 < parts.len() {
                segments.push(SentenceSegment::Blank {
                    index,
                    value: placement.blank(index).map(str::to_string),
                    correct: feedback.as_ref().and_then(|marks| marks.get(index).copied()),
                });
            }
        }
        segments
    }

    #[must_use]
    pub fn pool(&self) -> &[String] {
        self.session.placement().pool()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&'static str> {
        match self.session.phase() {
            ExercisePhase::Checked { correct: true } => Some("Correct!"),
            ExercisePhase::Checked { correct: false } => {
                Some("Not quite. Rearrange the words and check again.")
            }
            ExercisePhase::Answering | ExercisePhase::Completed => None,
        }
    }

    #[must_use]
    pub fn can_check(&self) -> bool {
        self.session.can_check()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.session.is_answer_correct()
    }

    #[must_use]
    pub fn can_drag(&self) -> bool {
        self.session.can_rearrange()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.session.current_index() + 1 == self.session.total_questions()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Score handed to the completion callback, once it fired.
    #[must_use]
    pub fn reported_score(&self) -> Option<ExerciseScore> {
        self.reported.lock().ok().and_then(|slot| *slot)
    }

    /// Apply a finished drag. Invalid moves leave the exercise unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the move is rejected.
    pub fn drop_item(
        &mut self,
        source: &DragSource,
        destination: Option<DropZone>,
        destination_index: usize,
    ) -> Result<(), ViewError> {
        let mv = source.drop_on(destination, destination_index);
        self.session.apply_move(&mv).map_err(|err| {
            tracing::debug!(error = %err, ?mv, "rejected move");
            ViewError::Unknown
        })
    }

    /// # Errors
    ///
    /// Returns `ViewError::BlanksUnfilled` while a blank is empty, or another
    /// `ViewError` if the question cannot be checked now.
    pub fn check(&mut self) -> Result<bool, ViewError> {
        self.session
            .check()
            .map(|verdict| verdict.is_correct())
            .map_err(map_exercise_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::NotReadyToAdvance` unless the current question was
    /// answered correctly.
    pub fn advance(&mut self) -> Result<FillBlankOutcome, ViewError> {
        match self.session.advance(self.clock.now()) {
            Ok(Advance::Next { .. }) => Ok(FillBlankOutcome::Continue),
            Ok(Advance::Completed(score)) => Ok(FillBlankOutcome::Completed(score)),
            Err(err) => Err(map_exercise_error(err)),
        }
    }
}

fn map_exercise_error(err: ExerciseError) -> ViewError {
    match err {
        ExerciseError::Empty => ViewError::EmptySession,
        ExerciseError::BlanksUnfilled { .. } => ViewError::BlanksUnfilled,
        ExerciseError::NotReadyToAdvance => ViewError::NotReadyToAdvance,
        _ => ViewError::Unknown,
    }
}

/// # Errors
///
/// Returns `ViewError::EmptySession` when there are no questions.
pub fn start_fill_blank(
    practice: PracticeService,
    questions: Vec<FillBlankQuestion>,
) -> Result<FillBlankVm, ViewError> {
    let reported = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&reported);
    let session = practice
        .start_fill_blank(questions, move |score| {
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(score);
            }
        })
        .map_err(map_exercise_error)?;

    Ok(FillBlankVm {
        session,
        clock: practice.clock(),
        reported,
    })
}
