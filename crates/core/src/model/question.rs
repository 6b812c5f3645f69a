use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("{options} options need {expected} sentence parts, got {actual}")]
    PartCountMismatch {
        options: usize,
        expected: usize,
        actual: usize,
    },

    #[error("quiz question is missing its {field}")]
    MissingField { field: &'static str },
}

//
// ─── FILL IN THE BLANK ─────────────────────────────────────────────────────────
//

/// A sentence split around its blanks.
///
/// `N + 1` sentence parts define `N` blanks, and the option at index `i` is
/// the correct answer for blank `i`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    try_from = "FillBlankQuestionDraft"
)]
pub struct FillBlankQuestion {
    sentence_parts: Vec<String>,
    options: Vec<String>,
}

/// Unvalidated wire shape of a [`FillBlankQuestion`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankQuestionDraft {
    pub sentence_parts: Vec<String>,
    pub options: Vec<String>,
}

impl TryFrom<FillBlankQuestionDraft> for FillBlankQuestion {
    type Error = QuestionError;

    fn try_from(draft: FillBlankQuestionDraft) -> Result<Self, Self::Error> {
        Self::new(draft.sentence_parts, draft.options)
    }
}

impl FillBlankQuestion {
    /// # Errors
    ///
    /// Returns `QuestionError::PartCountMismatch` unless there is exactly one
    /// more sentence part than options.
    pub fn new<P, O>(sentence_parts: P, options: O) -> Result<Self, QuestionError>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        let sentence_parts: Vec<String> = sentence_parts.into_iter().map(Into::into).collect();
        let options: Vec<String> = options.into_iter().map(Into::into).collect();

        let expected = options.len() + 1;
        if sentence_parts.len() != expected {
            return Err(QuestionError::PartCountMismatch {
                options: options.len(),
                expected,
                actual: sentence_parts.len(),
            });
        }

        Ok(Self {
            sentence_parts,
            options,
        })
    }

    #[must_use]
    pub fn sentence_parts(&self) -> &[String] {
        &self.sentence_parts
    }

    /// Answer key in blank order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.options.len()
    }

    /// The correct answer for blank `index`, if that blank exists.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

/// A generated multiple-choice question attached to a subtopic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_correct(&self, selection: &str) -> bool {
        self.answer == selection
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    #[must_use]
    pub fn has_explanation(&self) -> bool {
        !self.explanation.trim().is_empty()
    }

    /// Checks that every field a generated question must carry is present.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingField` naming the first empty field.
    pub fn validate_generated(&self) -> Result<(), QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::MissingField { field: "question" });
        }
        if self.options.is_empty() {
            return Err(QuestionError::MissingField { field: "options" });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::MissingField { field: "answer" });
        }
        if !self.has_explanation() {
            return Err(QuestionError::MissingField {
                field: "explanation",
            });
        }
        Ok(())
    }
}
