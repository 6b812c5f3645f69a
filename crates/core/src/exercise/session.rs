use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::FillBlankQuestion;

use super::evaluator::{Verdict, blank_feedback, evaluate};
use super::placement::{Placement, PlacementError, resolve_move};
use super::zone::MoveDescriptor;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("no questions available for exercise")]
    Empty,

    #[error("exercise already completed")]
    Completed,

    #[error("answer is locked after a correct check")]
    Locked,

    #[error("{remaining} blanks are still empty")]
    BlanksUnfilled { remaining: usize },

    #[error("current question was already checked")]
    AlreadyChecked,

    #[error("current question must be answered correctly before advancing")]
    NotReadyToAdvance,

    #[error("question {index} does not exist (exercise has {total})")]
    QuestionOutOfRange { index: usize, total: usize },

    #[error("question {index} was already answered correctly")]
    AlreadyScored { index: usize },

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where the current question stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExercisePhase {
    Answering,
    Checked { correct: bool },
    Completed,
}

/// Final result reported once the last question is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseScore {
    pub score: u32,
    pub total_questions: u32,
}

/// Result of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Completed(ExerciseScore),
}

/// Progress snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseProgress {
    /// One-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub score: u32,
    pub is_complete: bool,
}

/// Invoked exactly once with the final score.
pub type CompletionCallback = Box<dyn FnOnce(ExerciseScore) + Send>;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State controller and sequencer for a fill-in-the-blank exercise.
///
/// Owns the current question index, the blank assignments and option pool of
/// that question, and the running score. The flow per question is
/// `Answering -> Checked -> (next question | Completed)`.
///
/// After an incorrect check the learner may keep rearranging; the first
/// placement that changes anything returns the question to `Answering` so it
/// can be checked again. A correct check locks the answer.
pub struct FillBlankSession {
    questions: Vec<FillBlankQuestion>,
    current: usize,
    placement: Placement,
    score: u32,
    /// Questions that already earned their point.
    scored: Vec<bool>,
    phase: ExercisePhase,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    on_complete: Option<CompletionCallback>,
}

impl FillBlankSession {
    /// Start an exercise at its first question.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::Empty` if `questions` is empty.
    pub fn new(
        questions: Vec<FillBlankQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ExerciseError> {
        let Some(first) = questions.first() else {
            return Err(ExerciseError::Empty);
        };
        let placement = Placement::for_question(first);
        let scored = vec![false; questions.len()];

        Ok(Self {
            questions,
            current: 0,
            placement,
            score: 0,
            scored,
            phase: ExercisePhase::Answering,
            started_at,
            completed_at: None,
            on_complete: None,
        })
    }

    /// Register the callback that receives the final score.
    #[must_use]
    pub fn with_completion(
        mut self,
        on_complete: impl FnOnce(ExerciseScore) + Send + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    #[must_use]
    pub fn current_question(&self) -> &FillBlankQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        matches!(self.phase, ExercisePhase::Checked { .. })
    }

    #[must_use]
    pub fn is_answer_correct(&self) -> bool {
        matches!(self.phase, ExercisePhase::Checked { correct: true })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == ExercisePhase::Completed
    }

    /// Whether a check would be accepted right now.
    #[must_use]
    pub fn can_check(&self) -> bool {
        self.phase == ExercisePhase::Answering && self.placement.is_complete()
    }

    /// Whether placements may still change.
    #[must_use]
    pub fn can_rearrange(&self) -> bool {
        matches!(
            self.phase,
            ExercisePhase::Answering | ExercisePhase::Checked { correct: false }
        )
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> ExerciseProgress {
        ExerciseProgress {
            position: self.current + 1,
            total: self.questions.len(),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// The final score, once completed.
    #[must_use]
    pub fn final_score(&self) -> Option<ExerciseScore> {
        self.is_complete().then(|| self.score_snapshot())
    }

    /// Per-blank correctness, available after a check.
    #[must_use]
    pub fn blank_feedback(&self) -> Option<Vec<bool>> {
        self.is_checked().then(|| {
            blank_feedback(
                self.placement.blanks(),
                self.current_question().options(),
            )
        })
    }

    /// Apply a drag-and-drop move to the current question.
    ///
    /// A move that leaves the placement unchanged does not alter the phase.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::Completed` after completion, `ExerciseError::Locked`
    /// after a correct check, and `ExerciseError::Placement` for invalid moves.
    /// The state is unchanged on error.
    pub fn apply_move(&mut self, mv: &MoveDescriptor) -> Result<(), ExerciseError> {
        match self.phase {
            ExercisePhase::Completed => return Err(ExerciseError::Completed),
            ExercisePhase::Checked { correct: true } => return Err(ExerciseError::Locked),
            ExercisePhase::Answering | ExercisePhase::Checked { correct: false } => {}
        }

        let next = resolve_move(&self.placement, mv)?;
        if next != self.placement {
            self.placement = next;
            self.phase = ExercisePhase::Answering;
        }
        Ok(())
    }

    /// Grade the current question. A correct answer adds one point, at most
    /// once per question.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::BlanksUnfilled` while any blank is empty,
    /// `ExerciseError::AlreadyChecked` if nothing changed since the last check,
    /// and `ExerciseError::Completed` after completion.
    pub fn check(&mut self) -> Result<Verdict, ExerciseError> {
        match self.phase {
            ExercisePhase::Completed => return Err(ExerciseError::Completed),
            ExercisePhase::Checked { .. } => return Err(ExerciseError::AlreadyChecked),
            ExercisePhase::Answering => {}
        }

        let remaining = self.placement.empty_blanks();
        if remaining > 0 {
            return Err(ExerciseError::BlanksUnfilled { remaining });
        }

        let verdict = evaluate(self.placement.blanks(), self.current_question().options());
        if verdict.is_correct() && !self.scored[self.current] {
            self.scored[self.current] = true;
            self.score += 1;
        }
        self.phase = ExercisePhase::Checked {
            correct: verdict.is_correct(),
        };
        Ok(verdict)
    }

    /// Move past a correctly answered question to the next one that has not
    /// earned its point yet.
    ///
    /// When none is left this completes the exercise, fires the completion
    /// callback, and returns the final score.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::NotReadyToAdvance` unless the current question was
    /// checked correct, and `ExerciseError::Completed` after completion.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, ExerciseError> {
        match self.phase {
            ExercisePhase::Completed => Err(ExerciseError::Completed),
            ExercisePhase::Answering | ExercisePhase::Checked { correct: false } => {
                Err(ExerciseError::NotReadyToAdvance)
            }
            ExercisePhase::Checked { correct: true } => {
                let next = (self.current + 1..self.questions.len()).find(|&i| !self.scored[i]);
                if let Some(next) = next {
                    self.advance_to_question(next)?;
                    return Ok(Advance::Next { index: next });
                }

                self.phase = ExercisePhase::Completed;
                self.completed_at = Some(now);
                let score = self.score_snapshot();
                if let Some(on_complete) = self.on_complete.take() {
                    on_complete(score);
                }
                Ok(Advance::Completed(score))
            }
        }
    }

    /// Jump to `index`, resetting every per-question field at once.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::QuestionOutOfRange` for an unknown index,
    /// `ExerciseError::AlreadyScored` for a question that already earned its
    /// point, and `ExerciseError::Completed` after completion.
    pub fn advance_to_question(&mut self, index: usize) -> Result<(), ExerciseError> {
        if self.is_complete() {
            return Err(ExerciseError::Completed);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(ExerciseError::QuestionOutOfRange {
                index,
                total: self.questions.len(),
            })?;
        if self.scored[index] {
            return Err(ExerciseError::AlreadyScored { index });
        }

        self.placement = Placement::for_question(question);
        self.current = index;
        self.phase = ExercisePhase::Answering;
        Ok(())
    }

    fn score_snapshot(&self) -> ExerciseScore {
        ExerciseScore {
            score: self.score,
            total_questions: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Debug for FillBlankSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillBlankSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("placement", &self.placement)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::exercise::{DropZone, MoveDescriptor};
    use crate::time::fixed_now;

    fn questions() -> Vec<FillBlankQuestion> {
        vec![
            FillBlankQuestion::new(["The ", " fox jumps over the ", " dog."], ["quick", "lazy"])
                .unwrap(),
            FillBlankQuestion::new(["I love ", " and ", "."], ["coffee", "tea"]).unwrap(),
        ]
    }

    fn recorder() -> (Arc<Mutex<Vec<ExerciseScore>>>, impl FnOnce(ExerciseScore) + Send) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |score| sink.lock().unwrap().push(score))
    }

    fn fill_correctly(session: &mut FillBlankSession) {
        let answers: Vec<String> = session.current_question().options().to_vec();
        for (blank, answer) in answers.into_iter().enumerate() {
            session
                .apply_move(&MoveDescriptor::pool_to_blank(answer, blank))
                .unwrap();
        }
    }

    #[test]
    fn empty_exercise_is_rejected() {
        let err = FillBlankSession::new(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, ExerciseError::Empty);
    }

    #[test]
    fn correct_run_reports_full_score_once() {
        let (calls, on_complete) = recorder();
        let mut session = FillBlankSession::new(questions(), fixed_now())
            .unwrap()
            .with_completion(on_complete);

        fill_correctly(&mut session);
        assert_eq!(session.check().unwrap(), Verdict::Correct);
        assert_eq!(session.advance(fixed_now()).unwrap(), Advance::Next { index: 1 });
        assert!(calls.lock().unwrap().is_empty());

        fill_correctly(&mut session);
        assert_eq!(session.check().unwrap(), Verdict::Correct);
        let expected = ExerciseScore {
            score: 2,
            total_questions: 2,
        };
        assert_eq!(
            session.advance(fixed_now()).unwrap(),
            Advance::Completed(expected)
        );

        assert_eq!(*calls.lock().unwrap(), [expected]);
        assert!(session.is_complete());
        assert_eq!(session.final_score(), Some(expected));
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.advance(fixed_now()), Err(ExerciseError::Completed));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn check_requires_every_blank() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        assert!(!session.can_check());
        session
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 0))
            .unwrap();
        assert_eq!(
            session.check(),
            Err(ExerciseError::BlanksUnfilled { remaining: 1 })
        );
        assert_eq!(session.phase(), ExercisePhase::Answering);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn incorrect_check_allows_rearranging_and_rechecking() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        session
            .apply_move(&MoveDescriptor::pool_to_blank("lazy", 0))
            .unwrap();
        session
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 1))
            .unwrap();

        assert_eq!(session.check().unwrap(), Verdict::Incorrect);
        assert_eq!(session.phase(), ExercisePhase::Checked { correct: false });
        assert_eq!(session.blank_feedback(), Some(vec![false, false]));
        assert_eq!(session.advance(fixed_now()), Err(ExerciseError::NotReadyToAdvance));
        assert_eq!(session.check(), Err(ExerciseError::AlreadyChecked));

        session
            .apply_move(&MoveDescriptor::blank_to_blank(0, 1, "lazy"))
            .unwrap();
        assert_eq!(session.phase(), ExercisePhase::Answering);
        assert_eq!(session.check().unwrap(), Verdict::Correct);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn noop_move_keeps_checked_state() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        session
            .apply_move(&MoveDescriptor::pool_to_blank("lazy", 0))
            .unwrap();
        session
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 1))
            .unwrap();
        session.check().unwrap();

        session
            .apply_move(&MoveDescriptor::dropped_outside(DropZone::Blank(0), "lazy"))
            .unwrap();
        assert_eq!(session.phase(), ExercisePhase::Checked { correct: false });
    }

    #[test]
    fn correct_answer_is_locked() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        fill_correctly(&mut session);
        session.check().unwrap();
        assert!(!session.can_rearrange());
        assert_eq!(
            session.apply_move(&MoveDescriptor::blank_to_pool(0, "quick")),
            Err(ExerciseError::Locked)
        );
        assert_eq!(session.placement().blank(0), Some("quick"));
    }

    #[test]
    fn invalid_move_leaves_state_untouched() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        let before = session.placement().clone();
        let err = session
            .apply_move(&MoveDescriptor::pool_to_blank("slow", 0))
            .unwrap_err();
        assert!(matches!(err, ExerciseError::Placement(_)));
        assert_eq!(session.placement(), &before);
    }

    #[test]
    fn advancing_resets_question_state() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        fill_correctly(&mut session);
        session.check().unwrap();
        session.advance(fixed_now()).unwrap();

        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), ExercisePhase::Answering);
        assert_eq!(session.placement().blanks(), [None, None]);
        assert_eq!(session.placement().pool(), ["coffee", "tea"]);
        assert_eq!(session.blank_feedback(), None);
        assert_eq!(
            session.progress(),
            ExerciseProgress {
                position: 2,
                total: 2,
                score: 1,
                is_complete: false,
            }
        );
    }

    #[test]
    fn advance_to_question_rejects_unknown_index() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        assert_eq!(
            session.advance_to_question(2),
            Err(ExerciseError::QuestionOutOfRange { index: 2, total: 2 })
        );
        session.advance_to_question(1).unwrap();
        assert_eq!(session.current_question().options(), ["coffee", "tea"]);
    }

    #[test]
    fn scored_question_cannot_be_revisited() {
        let (calls, on_complete) = recorder();
        let mut session = FillBlankSession::new(questions(), fixed_now())
            .unwrap()
            .with_completion(on_complete);
        fill_correctly(&mut session);
        assert!(session.check().unwrap().is_correct());

        assert_eq!(
            session.advance_to_question(0),
            Err(ExerciseError::AlreadyScored { index: 0 })
        );
        assert_eq!(session.phase(), ExercisePhase::Checked { correct: true });
        assert_eq!(session.score(), 1);

        session.advance(fixed_now()).unwrap();
        assert_eq!(
            session.advance_to_question(0),
            Err(ExerciseError::AlreadyScored { index: 0 })
        );
        fill_correctly(&mut session);
        session.check().unwrap();
        let done = session.advance(fixed_now()).unwrap();

        let expected = ExerciseScore {
            score: 2,
            total_questions: 2,
        };
        assert_eq!(done, Advance::Completed(expected));
        assert_eq!(*calls.lock().unwrap(), vec![expected]);
    }

    #[test]
    fn revisiting_an_unscored_question_keeps_score_bounded() {
        let mut session = FillBlankSession::new(questions(), fixed_now()).unwrap();
        session.advance_to_question(1).unwrap();
        fill_correctly(&mut session);
        assert!(session.check().unwrap().is_correct());

        session.advance_to_question(0).unwrap();
        fill_correctly(&mut session);
        assert!(session.check().unwrap().is_correct());
        assert_eq!(session.score(), 2);
        assert_eq!(
            session.advance_to_question(1),
            Err(ExerciseError::AlreadyScored { index: 1 })
        );

        let done = session.advance(fixed_now()).unwrap();
        assert_eq!(
            done,
            Advance::Completed(ExerciseScore {
                score: 2,
                total_questions: 2,
            })
        );
    }

    #[test]
    fn clearing_then_refilling_matches_direct_placement() {
        let mut detour = FillBlankSession::new(questions(), fixed_now()).unwrap();
        detour
            .apply_move(&MoveDescriptor::pool_to_blank("lazy", 0))
            .unwrap();
        detour
            .apply_move(&MoveDescriptor::blank_to_pool(0, "lazy"))
            .unwrap();
        detour
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 0))
            .unwrap();

        let mut direct = FillBlankSession::new(questions(), fixed_now()).unwrap();
        direct
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 0))
            .unwrap();

        assert_eq!(detour.placement().blanks(), direct.placement().blanks());
        assert_eq!(detour.placement().pool(), ["lazy"]);
    }

    #[test]
    fn corrected_answer_still_scores() {
        let (calls, on_complete) = recorder();
        let mut session = FillBlankSession::new(questions(), fixed_now())
            .unwrap()
            .with_completion(on_complete);

        // Wrong first, then corrected: the corrected check still earns the point.
        session
            .apply_move(&MoveDescriptor::pool_to_blank("lazy", 0))
            .unwrap();
        session
            .apply_move(&MoveDescriptor::pool_to_blank("quick", 1))
            .unwrap();
        session.check().unwrap();
        session
            .apply_move(&MoveDescriptor::blank_to_blank(0, 1, "lazy"))
            .unwrap();
        session.check().unwrap();
        session.advance(fixed_now()).unwrap();

        fill_correctly(&mut session);
        session.check().unwrap();
        session.advance(fixed_now()).unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            [ExerciseScore {
                score: 2,
                total_questions: 2,
            }]
        );
    }
}
