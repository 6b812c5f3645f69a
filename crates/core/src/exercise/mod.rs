//! Fill-in-the-blank exercise state.
//!
//! [`resolve_move`] computes the next placement for a drag-and-drop move,
//! [`evaluate`] grades a completed placement, and [`FillBlankSession`] owns the
//! per-question state and sequences through the questions.

mod evaluator;
mod placement;
mod session;
mod zone;

pub use evaluator::{Verdict, blank_feedback, evaluate};
pub use placement::{Placement, PlacementError, resolve_move};
pub use session::{
    Advance, CompletionCallback, ExerciseError, ExercisePhase, ExerciseProgress, ExerciseScore,
    FillBlankSession,
};
pub use zone::{DropZone, MoveDescriptor};
