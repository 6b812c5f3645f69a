//! Multiple-choice quiz over a subtopic's questions.
//!
//! The flow per question is select, check, then next. The quiz can be ended at
//! any point; only checked questions count toward the results.

use thiserror::Error;

use crate::model::{QuestionError, QuizQuestion};

/// Generated questions stop being requested once a quiz holds this many.
pub const MAX_QUIZ_QUESTIONS: usize = 100;

pub const NO_MORE_QUESTIONS: &str = "No more questions available.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("quiz is finished")]
    Finished,

    #[error("select an option before checking")]
    NoSelection,

    #[error("{option:?} is not an option for this question")]
    UnknownOption { option: String },

    #[error("current question was already checked")]
    AlreadyChecked,

    #[error("check the current question before moving on")]
    NotChecked,

    #[error("appended question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Answering,
    Checked { correct: bool },
    Finished,
}

/// What the learner picked for one checked question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    pub question: String,
    pub selected: String,
    pub answer: String,
    pub explanation: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub correct: u32,
    pub answered: u32,
    pub total: usize,
    pub percent: u32,
    pub review: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next { index: usize },
    Finished(QuizResults),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceQuiz {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<String>,
    phase: QuizPhase,
    review: Vec<QuizAnswer>,
}

impl MultipleChoiceQuiz {
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when there are no questions.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
            selected: None,
            phase: QuizPhase::Answering,
            review: Vec::new(),
        })
    }

    /// The question on screen, or `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        matches!(self.phase, QuizPhase::Checked { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        count_u32(self.review.iter().filter(|answer| answer.correct).count())
    }

    #[must_use]
    pub fn answered_count(&self) -> u32 {
        count_u32(self.review.len())
    }

    /// Explanation for the current question, revealed after checking.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        if !self.is_checked() {
            return None;
        }
        self.questions
            .get(self.current)
            .map(|question| question.explanation.as_str())
    }

    /// # Errors
    ///
    /// Returns `QuizError::AlreadyChecked` after checking, `QuizError::Finished`
    /// once the quiz is over, and `QuizError::UnknownOption` for a value the
    /// question does not offer.
    pub fn select(&mut self, option: &str) -> Result<(), QuizError> {
        let question = self.answering_question()?;
        if !question.has_option(option) {
            return Err(QuizError::UnknownOption {
                option: option.to_string(),
            });
        }
        self.selected = Some(option.to_string());
        Ok(())
    }

    /// Grade the selection and reveal the explanation.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` without a selection, plus the errors of
    /// [`MultipleChoiceQuiz::select`] for the wrong phase.
    pub fn check(&mut self) -> Result<bool, QuizError> {
        let question = self.answering_question()?;
        let Some(selected) = self.selected.clone() else {
            return Err(QuizError::NoSelection);
        };

        let correct = question.is_correct(&selected);
        let record = QuizAnswer {
            question: question.question.clone(),
            selected,
            answer: question.answer.clone(),
            explanation: question.explanation.clone(),
            correct,
        };
        self.review.push(record);
        self.phase = QuizPhase::Checked { correct };
        Ok(correct)
    }

    /// Move to the next question, finishing after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotChecked` before the current question is checked
    /// and `QuizError::Finished` once the quiz is over.
    pub fn next(&mut self) -> Result<QuizStep, QuizError> {
        match self.phase {
            QuizPhase::Finished => Err(QuizError::Finished),
            QuizPhase::Answering => Err(QuizError::NotChecked),
            QuizPhase::Checked { .. } => {
                self.selected = None;
                let next = self.current + 1;
                if next < self.questions.len() {
                    self.current = next;
                    self.phase = QuizPhase::Answering;
                    Ok(QuizStep::Next { index: next })
                } else {
                    Ok(QuizStep::Finished(self.end()))
                }
            }
        }
    }

    /// Stop the quiz now. Unchecked questions are not counted.
    pub fn end(&mut self) -> QuizResults {
        self.phase = QuizPhase::Finished;
        self.selected = None;
        self.results()
    }

    #[must_use]
    pub fn results(&self) -> QuizResults {
        let correct = self.correct_count();
        let answered = self.answered_count();
        QuizResults {
            correct,
            answered,
            total: self.questions.len(),
            percent: percent(correct, answered),
            review: self.review.clone(),
        }
    }

    /// Whether the quiz is about to run out and may still grow.
    ///
    /// True when at most one question remains after the current one and the
    /// quiz holds fewer than `cap` questions.
    #[must_use]
    pub fn needs_more_questions(&self, cap: usize) -> bool {
        if self.is_finished() || self.questions.len() >= cap {
            return false;
        }
        let remaining_after_current = self.questions.len().saturating_sub(self.current + 1);
        remaining_after_current <= 1
    }

    /// Append generated questions at the end. Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidQuestion` if any question is incomplete, in
    /// which case none are added, and `QuizError::Finished` once the quiz is over.
    pub fn append_questions(&mut self, questions: Vec<QuizQuestion>) -> Result<usize, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate_generated()
                .map_err(|source| QuizError::InvalidQuestion { index, source })?;
        }
        let added = questions.len();
        self.questions.extend(questions);
        Ok(added)
    }

    fn answering_question(&self) -> Result<&QuizQuestion, QuizError> {
        match self.phase {
            QuizPhase::Finished => Err(QuizError::Finished),
            QuizPhase::Checked { .. } => Err(QuizError::AlreadyChecked),
            QuizPhase::Answering => self.questions.get(self.current).ok_or(QuizError::Finished),
        }
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn percent(correct: u32, answered: u32) -> u32 {
    if answered == 0 {
        return 0;
    }
    // correct <= answered, so the result is within 0..=100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = (f64::from(correct) / f64::from(answered) * 100.0).round() as u32;
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("Question {n}?"),
            options: vec!["right".into(), "wrong".into()],
            answer: "right".into(),
            explanation: format!("Explanation {n}."),
        }
    }

    fn quiz(len: usize) -> MultipleChoiceQuiz {
        MultipleChoiceQuiz::new((0..len).map(question).collect()).unwrap()
    }

    fn answer(quiz: &mut MultipleChoiceQuiz, option: &str) -> bool {
        quiz.select(option).unwrap();
        quiz.check().unwrap()
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(MultipleChoiceQuiz::new(Vec::new()), Err(QuizError::Empty));
    }

    #[test]
    fn select_check_next_until_finished() {
        let mut quiz = quiz(2);
        assert_eq!(quiz.check(), Err(QuizError::NoSelection));
        assert_eq!(quiz.next(), Err(QuizError::NotChecked));

        assert!(answer(&mut quiz, "right"));
        assert_eq!(quiz.explanation(), Some("Explanation 0."));
        assert_eq!(quiz.select("wrong"), Err(QuizError::AlreadyChecked));
        assert_eq!(quiz.next().unwrap(), QuizStep::Next { index: 1 });
        assert_eq!(quiz.selected(), None);
        assert_eq!(quiz.explanation(), None);

        assert!(!answer(&mut quiz, "wrong"));
        let QuizStep::Finished(results) = quiz.next().unwrap() else {
            panic!("quiz should be finished");
        };
        assert_eq!(results.correct, 1);
        assert_eq!(results.answered, 2);
        assert_eq!(results.total, 2);
        assert_eq!(results.percent, 50);
        assert_eq!(results.review[1].selected, "wrong");
        assert!(quiz.current_question().is_none());
        assert_eq!(quiz.next(), Err(QuizError::Finished));
    }

    #[test]
    fn selection_can_change_before_check() {
        let mut quiz = quiz(1);
        quiz.select("wrong").unwrap();
        quiz.select("right").unwrap();
        assert!(quiz.check().unwrap());
        assert_eq!(
            quiz.select("maybe"),
            Err(QuizError::AlreadyChecked)
        );
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut quiz = quiz(1);
        assert_eq!(
            quiz.select("maybe"),
            Err(QuizError::UnknownOption {
                option: "maybe".into(),
            })
        );
    }

    #[test]
    fn ending_early_counts_only_checked_questions() {
        let mut quiz = quiz(5);
        answer(&mut quiz, "right");
        quiz.next().unwrap();
        quiz.select("wrong").unwrap();

        let results = quiz.end();
        assert_eq!(results.correct, 1);
        assert_eq!(results.answered, 1);
        assert_eq!(results.total, 5);
        assert_eq!(results.percent, 100);
        assert!(quiz.is_finished());
    }

    #[test]
    fn needs_more_questions_near_the_end() {
        let mut quiz = quiz(3);
        assert!(!quiz.needs_more_questions(MAX_QUIZ_QUESTIONS));
        answer(&mut quiz, "right");
        quiz.next().unwrap();
        assert!(quiz.needs_more_questions(MAX_QUIZ_QUESTIONS));
        assert!(!quiz.needs_more_questions(3));
    }

    #[test]
    fn append_extends_the_quiz() {
        let mut quiz = quiz(1);
        assert_eq!(quiz.append_questions(vec![question(1), question(2)]), Ok(2));
        assert_eq!(quiz.len(), 3);

        answer(&mut quiz, "right");
        assert_eq!(quiz.next().unwrap(), QuizStep::Next { index: 1 });
    }

    #[test]
    fn append_rejects_incomplete_questions() {
        let mut quiz = quiz(1);
        let mut broken = question(1);
        broken.explanation.clear();
        assert_eq!(
            quiz.append_questions(vec![question(2), broken]),
            Err(QuizError::InvalidQuestion {
                index: 1,
                source: QuestionError::MissingField {
                    field: "explanation",
                },
            })
        );
        assert_eq!(quiz.len(), 1);
    }
}
