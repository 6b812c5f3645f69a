use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const CORRECT_ORDER_FEEDBACK: &str = "Correct order!";
pub const TRY_AGAIN_FEEDBACK: &str = "Try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SortingError {
    #[error("no items to sort")]
    Empty,

    #[error("position {index} is out of range (list has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Put a shuffled list back into its authored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortingExercise {
    expected: Vec<String>,
    current: Vec<String>,
    feedback: Option<&'static str>,
}

impl SortingExercise {
    /// Start with the items in authored order.
    ///
    /// # Errors
    ///
    /// Returns `SortingError::Empty` when `items` is empty.
    pub fn new<I, S>(items: I) -> Result<Self, SortingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected: Vec<String> = items.into_iter().map(Into::into).collect();
        if expected.is_empty() {
            return Err(SortingError::Empty);
        }
        Ok(Self {
            current: expected.clone(),
            expected,
            feedback: None,
        })
    }

    /// Start from a random permutation of `items`.
    ///
    /// # Errors
    ///
    /// Returns `SortingError::Empty` when `items` is empty.
    pub fn shuffled<I, S, R>(items: I, rng: &mut R) -> Result<Self, SortingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: Rng + ?Sized,
    {
        let mut exercise = Self::new(items)?;
        exercise.current.shuffle(rng);
        Ok(exercise)
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.current
    }

    #[must_use]
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&'static str> {
        self.feedback
    }

    #[must_use]
    pub fn is_in_order(&self) -> bool {
        self.current == self.expected
    }

    /// Move the item at `source` to `destination`; `None` means it was dropped
    /// outside the list. The destination is clamped to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `SortingError::IndexOutOfRange` for an unknown source position.
    pub fn reorder(&mut self, source: usize, destination: Option<usize>) -> Result<(), SortingError> {
        let Some(destination) = destination else {
            return Ok(());
        };
        if source >= self.current.len() {
            return Err(SortingError::IndexOutOfRange {
                index: source,
                len: self.current.len(),
            });
        }
        let moved = self.current.remove(source);
        let destination = destination.min(self.current.len());
        self.current.insert(destination, moved);
        self.feedback = None;
        Ok(())
    }

    /// Compare against the authored order and record feedback.
    pub fn check(&mut self) -> bool {
        let correct = self.is_in_order();
        self.feedback = Some(if correct {
            CORRECT_ORDER_FEEDBACK
        } else {
            TRY_AGAIN_FEEDBACK
        });
        correct
    }
}
