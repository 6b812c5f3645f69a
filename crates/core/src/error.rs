use thiserror::Error;

use crate::exercise::{ExerciseError, PlacementError};
use crate::model::{KnowledgeMapError, QuestionError};
use crate::quiz::QuizError;
use crate::roadmap::RoadmapError;
use crate::sorting::SortingError;

/// Umbrella error for callers that drive several exercise kinds at once.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Sorting(#[from] SortingError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    KnowledgeMap(#[from] KnowledgeMapError),
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
}
