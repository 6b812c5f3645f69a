/// Outcome of grading one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Grade a placement against the answer key.
///
/// Correctness is positional: blank `i` must hold `options[i]`. The right words
/// in the wrong blanks are incorrect, and so is any empty blank.
#[must_use]
pub fn evaluate(blanks: &[Option<String>], options: &[String]) -> Verdict {
    let all_match = blanks.len() == options.len()
        && blanks
            .iter()
            .zip(options)
            .all(|(placed, expected)| placed.as_deref() == Some(expected.as_str()));

    if all_match {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Per-blank correctness, used to colour blanks after a check.
#[must_use]
pub fn blank_feedback(blanks: &[Option<String>], options: &[String]) -> Vec<bool> {
    blanks
        .iter()
        .enumerate()
        .map(|(index, placed)| {
            placed.as_deref().is_some_and(|value| {
                options.get(index).is_some_and(|expected| expected == value)
            })
        })
        .collect()
}
