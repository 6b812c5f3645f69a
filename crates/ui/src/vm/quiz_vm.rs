use readly_core::quiz::{QuizError, QuizPhase, QuizResults, QuizStep};
use services::{KnowledgeMapServiceError, QuizLoopError, QuizLoopService, QuizRun};

use crate::views::ViewError;
use crate::vm::map_knowledge_map_error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    /// Revealed as the right answer after a check.
    Correct,
    /// Picked by the learner and wrong.
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub question: String,
    pub selected: String,
    pub answer: String,
    pub explanation: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub score_label: String,
    pub percent: u32,
    pub mastery_percent: u32,
    pub status_label: &'static str,
    pub review: Vec<ReviewItemVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue { generated: usize },
    Finished,
}

pub struct QuizVm {
    run: QuizRun,
    results: Option<QuizResultsVm>,
}

impl QuizVm {
    #[must_use]
    pub fn new(run: QuizRun) -> Self {
        Self { run, results: None }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.run.subtopic().title
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let quiz = self.run.quiz();
        format!("Question {} of {}", quiz.current_index() + 1, quiz.len())
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.run
            .quiz()
            .current_question()
            .map(|question| question.question.as_str())
    }

    #[must_use]
    pub fn options(&self) -> Vec<QuizOptionVm> {
        let quiz = self.run.quiz();
        let Some(question) = quiz.current_question() else {
            return Vec::new();
        };
        let selected = quiz.selected();
        let checked = quiz.is_checked();

        question
            .options
            .iter()
            .map(|option| {
                let is_selected = selected == Some(option.as_str());
                let state = if checked && question.is_correct(option) {
                    OptionState::Correct
                } else if checked && is_selected {
                    OptionState::Wrong
                } else if is_selected {
                    OptionState::Selected
                } else {
                    OptionState::Idle
                };
                QuizOptionVm {
                    text: option.clone(),
                    state,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn verdict(&self) -> Option<bool> {
        match self.run.quiz().phase() {
            QuizPhase::Checked { correct } => Some(correct),
            QuizPhase::Answering | QuizPhase::Finished => None,
        }
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.run.quiz().explanation()
    }

    #[must_use]
    pub fn can_check(&self) -> bool {
        let quiz = self.run.quiz();
        !quiz.is_checked() && quiz.selected().is_some()
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.run.quiz().is_checked()
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResultsVm> {
        self.results.as_ref()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` once the answer is locked.
    pub fn select(&mut self, option: &str) -> Result<(), ViewError> {
        self.run
            .quiz_mut()
            .select(option)
            .map_err(|_| ViewError::Unknown)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when nothing is selected.
    pub fn check(&mut self) -> Result<bool, ViewError> {
        self.run.quiz_mut().check().map_err(|_| ViewError::Unknown)
    }

    /// Move on, topping up the quiz from the backend when it runs low.
    /// Reaching the end saves the run.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for an unchecked question or a failed save.
    pub async fn next(&mut self, quiz_loop: &QuizLoopService) -> Result<QuizOutcome, ViewError> {
        let advance = quiz_loop
            .next(&mut self.run)
            .await
            .map_err(|err| map_quiz_error(&err))?;
        match advance.step {
            QuizStep::Next { .. } => Ok(QuizOutcome::Continue {
                generated: advance.generated,
            }),
            QuizStep::Finished(_) => {
                self.finish(quiz_loop).await?;
                Ok(QuizOutcome::Finished)
            }
        }
    }

    /// End the quiz now, saving only the checked answers.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the results cannot be saved.
    pub async fn finish(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        let (results, saved) = quiz_loop
            .finish(&mut self.run)
            .await
            .map_err(|err| map_quiz_error(&err))?;
        self.results = Some(map_quiz_results(
            &results,
            saved.mastery_percent(),
            saved.status.as_str(),
        ));
        Ok(())
    }
}

#[must_use]
pub fn map_quiz_results(
    results: &QuizResults,
    mastery_percent: u32,
    status_label: &'static str,
) -> QuizResultsVm {
    QuizResultsVm {
        score_label: format!("{} / {} correct", results.correct, results.answered),
        percent: results.percent,
        mastery_percent,
        status_label,
        review: results
            .review
            .iter()
            .map(|answer| ReviewItemVm {
                question: answer.question.clone(),
                selected: answer.selected.clone(),
                answer: answer.answer.clone(),
                explanation: answer.explanation.clone(),
                correct: answer.correct,
            })
            .collect(),
    }
}

fn map_quiz_error(err: &QuizLoopError) -> ViewError {
    match err {
        QuizLoopError::Quiz(QuizError::Empty) => ViewError::EmptySession,
        QuizLoopError::Maps(err) => map_knowledge_map_error(err),
        _ => ViewError::Unknown,
    }
}

/// # Errors
///
/// Returns `ViewError::NotFound` for an unknown subtopic and
/// `ViewError::EmptySession` when it has no questions.
pub async fn start_quiz(quiz_loop: &QuizLoopService, title: &str) -> Result<QuizVm, ViewError> {
    match quiz_loop.start(title).await {
        Ok(run) => Ok(QuizVm::new(run)),
        Err(QuizLoopError::Maps(KnowledgeMapServiceError::SubtopicNotFound { .. })) => {
            Err(ViewError::NotFound)
        }
        Err(err) => {
            tracing::warn!(error = %err, title, "failed to start quiz");
            Err(map_quiz_error(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use readly_core::model::{MasteryStatus, QuizQuestion, Subtopic};

    use super::*;

    fn run() -> QuizRun {
        let subtopic = Subtopic {
            title: "Roots".to_string(),
            description: "How roots work.".to_string(),
            key_concepts: vec!["soil".to_string()],
            status: MasteryStatus::Unmastered,
            quiz: vec![QuizQuestion {
                question: "Roots absorb?".to_string(),
                options: vec!["water".to_string(), "light".to_string()],
                answer: "water".to_string(),
                explanation: "Roots take up water.".to_string(),
            }],
            answered: 0,
            correct: 0,
            context: None,
        };
        QuizLoopService::start_with(subtopic).unwrap()
    }

    #[test]
    fn options_reflect_selection_and_check() {
        let mut vm = QuizVm::new(run());
        assert!(!vm.can_check());

        vm.select("light").unwrap();
        assert!(vm.can_check());
        let states: Vec<OptionState> = vm.options().iter().map(|option| option.state).collect();
        assert_eq!(states, vec![OptionState::Idle, OptionState::Selected]);

        assert!(!vm.check().unwrap());
        let states: Vec<OptionState> = vm.options().iter().map(|option| option.state).collect();
        assert_eq!(states, vec![OptionState::Correct, OptionState::Wrong]);
        assert_eq!(vm.verdict(), Some(false));
        assert_eq!(vm.explanation(), Some("Roots take up water."));
        assert!(vm.select("water").is_err());
    }

    #[test]
    fn results_list_every_checked_answer() {
        let mut quiz_run = run();
        quiz_run.quiz_mut().select("water").unwrap();
        quiz_run.quiz_mut().check().unwrap();
        let results = quiz_run.quiz_mut().end();

        let vm = map_quiz_results(&results, 100, "unmastered");
        assert_eq!(vm.score_label, "1 / 1 correct");
        assert_eq!(vm.percent, 100);
        assert_eq!(vm.review.len(), 1);
        assert!(vm.review[0].correct);
    }
}
