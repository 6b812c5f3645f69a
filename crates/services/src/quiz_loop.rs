use std::sync::Arc;

use readly_core::model::Subtopic;
use readly_core::quiz::{MAX_QUIZ_QUESTIONS, MultipleChoiceQuiz, QuizResults, QuizStep};

use crate::backend::{BackendClient, GenerateQuestionsRequest};
use crate::error::QuizLoopError;
use crate::knowledge_maps::KnowledgeMapService;

/// A quiz in progress over one subtopic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRun {
    subtopic: Subtopic,
    quiz: MultipleChoiceQuiz,
    saved: Option<Subtopic>,
}

impl QuizRun {
    #[must_use]
    pub fn subtopic(&self) -> &Subtopic {
        &self.subtopic
    }

    #[must_use]
    pub fn quiz(&self) -> &MultipleChoiceQuiz {
        &self.quiz
    }

    /// Selection and checking go straight to the quiz.
    pub fn quiz_mut(&mut self) -> &mut MultipleChoiceQuiz {
        &mut self.quiz
    }

    /// The persisted subtopic, once the run was saved.
    #[must_use]
    pub fn saved(&self) -> Option<&Subtopic> {
        self.saved.as_ref()
    }
}

/// Result of moving past a checked question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAdvance {
    pub step: QuizStep,
    /// Questions appended by auto-generation during this step.
    pub generated: usize,
}

/// Drives multiple-choice quizzes and tops them up with generated questions.
#[derive(Clone, Debug)]
pub struct QuizLoopService {
    maps: Arc<KnowledgeMapService>,
    backend: Arc<BackendClient>,
    generate_count: u32,
    max_questions: usize,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(maps: Arc<KnowledgeMapService>, backend: Arc<BackendClient>) -> Self {
        let generate_count = backend.config().generate_count;
        Self {
            maps,
            backend,
            generate_count,
            max_questions: MAX_QUIZ_QUESTIONS,
        }
    }

    #[must_use]
    pub fn with_max_questions(mut self, max_questions: usize) -> Self {
        self.max_questions = max_questions;
        self
    }

    /// Start a quiz over the stored subtopic with this title.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Maps` when the subtopic cannot be loaded and
    /// `QuizLoopError::Quiz` when it has no questions.
    pub async fn start(&self, title: &str) -> Result<QuizRun, QuizLoopError> {
        let subtopic = self.maps.subtopic(title).await?;
        Self::start_with(subtopic)
    }

    /// Start a quiz over an already loaded subtopic.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Quiz` when the subtopic has no questions.
    pub fn start_with(subtopic: Subtopic) -> Result<QuizRun, QuizLoopError> {
        let quiz = MultipleChoiceQuiz::new(subtopic.quiz.clone())?;
        Ok(QuizRun {
            subtopic,
            quiz,
            saved: None,
        })
    }

    /// Move past the checked question, generating more questions first when
    /// the quiz is about to run out.
    ///
    /// A failed generation is logged and the quiz continues with what it has.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Quiz` if the current question is not checked or
    /// the quiz is already finished.
    pub async fn next(&self, run: &mut QuizRun) -> Result<QuizAdvance, QuizLoopError> {
        if !run.quiz.is_checked() {
            // Surface the quiz's own error without touching the backend.
            let step = run.quiz.next()?;
            return Ok(QuizAdvance { step, generated: 0 });
        }

        let generated = if run.quiz.needs_more_questions(self.max_questions) {
            self.top_up(run).await
        } else {
            0
        };

        let step = run.quiz.next()?;
        Ok(QuizAdvance { step, generated })
    }

    /// End the quiz (if still running) and persist its totals once.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Maps` if the result cannot be saved; the run can
    /// be finished again to retry.
    pub async fn finish(&self, run: &mut QuizRun) -> Result<(QuizResults, Subtopic), QuizLoopError> {
        let results = if run.quiz.is_finished() {
            run.quiz.results()
        } else {
            run.quiz.end()
        };

        if let Some(saved) = &run.saved {
            return Ok((results, saved.clone()));
        }

        let saved = self
            .maps
            .complete_quiz(run.subtopic.clone(), &results)
            .await?;
        run.saved = Some(saved.clone());
        Ok((results, saved))
    }

    async fn top_up(&self, run: &mut QuizRun) -> usize {
        let request = GenerateQuestionsRequest::for_subtopic(&run.subtopic, self.generate_count);
        let questions = match self.backend.generate_questions(&request).await {
            Ok(questions) => questions,
            Err(error) => {
                tracing::warn!(title = %run.subtopic.title, %error, "question generation failed");
                return 0;
            }
        };
        if questions.is_empty() {
            return 0;
        }

        let added = match run.quiz.append_questions(questions.clone()) {
            Ok(added) => added,
            Err(error) => {
                tracing::warn!(title = %run.subtopic.title, %error, "generated questions rejected");
                return 0;
            }
        };
        run.subtopic.append_questions(questions.iter().cloned());

        if let Err(error) = self
            .maps
            .append_questions(&run.subtopic.title, &questions)
            .await
        {
            tracing::warn!(title = %run.subtopic.title, %error, "could not persist generated questions");
        }
        tracing::info!(title = %run.subtopic.title, added, "quiz topped up");
        added
    }
}
