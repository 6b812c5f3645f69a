use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::{QuestionError, QuizQuestion};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KnowledgeMapError {
    #[error("invalid knowledge map json: {0}")]
    Json(String),

    #[error("question {question} in subtopic {subtopic} is missing an explanation")]
    MissingExplanation { subtopic: usize, question: usize },

    #[error("generated question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("correct answers ({correct}) exceed answered questions ({answered})")]
    InvalidTally { answered: u32, correct: u32 },
}

impl From<serde_json::Error> for KnowledgeMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

//
// ─── MASTERY ───────────────────────────────────────────────────────────────────
//

/// Mastery label persisted with every subtopic.
///
/// Anything other than `"mastered"` reads back as unmastered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    Mastered,
    #[default]
    #[serde(other)]
    Unmastered,
}

impl MasteryStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MasteryStatus::Mastered => "mastered",
            MasteryStatus::Unmastered => "unmastered",
        }
    }
}

/// Thresholds a subtopic must clear to count as mastered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteryPolicy {
    accuracy_threshold: f64,
    min_answered: u32,
}

impl Default for MasteryPolicy {
    fn default() -> Self {
        Self {
            accuracy_threshold: 0.8,
            min_answered: 100,
        }
    }
}

impl MasteryPolicy {
    #[must_use]
    pub fn new(accuracy_threshold: f64, min_answered: u32) -> Self {
        Self {
            accuracy_threshold: accuracy_threshold.clamp(0.0, 1.0),
            min_answered,
        }
    }

    #[must_use]
    pub fn accuracy_threshold(&self) -> f64 {
        self.accuracy_threshold
    }

    #[must_use]
    pub fn min_answered(&self) -> u32 {
        self.min_answered
    }

    #[must_use]
    pub fn status_for(&self, answered: u32, correct: u32) -> MasteryStatus {
        if answered >= self.min_answered && accuracy(answered, correct) >= self.accuracy_threshold
        {
            MasteryStatus::Mastered
        } else {
            MasteryStatus::Unmastered
        }
    }
}

fn accuracy(answered: u32, correct: u32) -> f64 {
    if answered == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(answered)
    }
}

//
// ─── SUBTOPIC ──────────────────────────────────────────────────────────────────
//

/// One node of a knowledge map, carrying its own quiz and running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub title: String,
    pub description: String,
    pub key_concepts: Vec<String>,
    pub status: MasteryStatus,
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub answered: u32,
    #[serde(default)]
    pub correct: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Subtopic {
    /// Share of answered questions that were correct, in `[0, 1]`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.answered, self.correct)
    }

    /// Accuracy as a rounded percentage for display.
    #[must_use]
    pub fn mastery_percent(&self) -> u32 {
        // accuracy() is within [0, 1], so the product fits comfortably.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.accuracy() * 100.0).round() as u32;
        percent.min(100)
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.status == MasteryStatus::Mastered
    }

    /// Adds one quiz run to the cumulative totals and recomputes the status.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapError::InvalidTally` if `correct > answered`.
    pub fn record_quiz(
        &mut self,
        answered: u32,
        correct: u32,
        policy: &MasteryPolicy,
    ) -> Result<MasteryStatus, KnowledgeMapError> {
        if correct > answered {
            return Err(KnowledgeMapError::InvalidTally { answered, correct });
        }
        self.answered = self.answered.saturating_add(answered);
        self.correct = self.correct.saturating_add(correct);
        self.status = policy.status_for(self.answered, self.correct);
        Ok(self.status)
    }

    pub fn append_questions(&mut self, questions: impl IntoIterator<Item = QuizQuestion>) {
        self.quiz.extend(questions);
    }
}

//
// ─── KNOWLEDGE MAP ─────────────────────────────────────────────────────────────
//

/// Outline of a document: one topic and its subtopics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeMap {
    pub topic: String,
    pub subtopics: Vec<Subtopic>,
}

impl KnowledgeMap {
    /// Parse and validate one serialized knowledge map document.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeMapError::Json` for malformed or incomplete documents and
    /// `KnowledgeMapError::MissingExplanation` when a quiz question has no explanation.
    pub fn parse(json: &str) -> Result<Self, KnowledgeMapError> {
        let map: KnowledgeMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// # Errors
    ///
    /// Returns `KnowledgeMapError::MissingExplanation` for the first question
    /// without an explanation.
    pub fn validate(&self) -> Result<(), KnowledgeMapError> {
        for (subtopic_index, subtopic) in self.subtopics.iter().enumerate() {
            if let Some(question_index) = subtopic.quiz.iter().position(|q| !q.has_explanation()) {
                return Err(KnowledgeMapError::MissingExplanation {
                    subtopic: subtopic_index,
                    question: question_index,
                });
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `KnowledgeMapError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, KnowledgeMapError> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn subtopic(&self, title: &str) -> Option<&Subtopic> {
        self.subtopics.iter().find(|sub| sub.title == title)
    }

    pub fn subtopic_mut(&mut self, title: &str) -> Option<&mut Subtopic> {
        self.subtopics.iter_mut().find(|sub| sub.title == title)
    }

    /// Replace every subtopic whose title matches `updated`. Returns how many were replaced.
    pub fn replace_subtopic(&mut self, updated: &Subtopic) -> usize {
        let mut replaced = 0;
        for sub in &mut self.subtopics {
            if sub.title == updated.title {
                *sub = updated.clone();
                replaced += 1;
            }
        }
        replaced
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.subtopics.iter().filter(|sub| sub.is_mastered()).count()
    }
}

/// Parse a JSON array of generated quiz questions, rejecting any with empty fields.
///
/// # Errors
///
/// Returns `KnowledgeMapError::Json` for malformed JSON and
/// `KnowledgeMapError::InvalidQuestion` for the first incomplete question.
pub fn parse_generated_questions(json: &str) -> Result<Vec<QuizQuestion>, KnowledgeMapError> {
    let questions: Vec<QuizQuestion> = serde_json::from_str(json)?;
    validate_generated_questions(&questions)?;
    Ok(questions)
}

/// # Errors
///
/// Returns `KnowledgeMapError::InvalidQuestion` for the first incomplete question.
pub fn validate_generated_questions(questions: &[QuizQuestion]) -> Result<(), KnowledgeMapError> {
    for (index, question) in questions.iter().enumerate() {
        question
            .validate_generated()
            .map_err(|source| KnowledgeMapError::InvalidQuestion { index, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "topic": "Photosynthesis",
        "subtopics": [
            {
                "title": "Light reactions",
                "description": "Capturing light energy.",
                "key_concepts": ["chlorophyll", "ATP"],
                "status": "unmastered",
                "quiz": [
                    {
                        "question": "Where do light reactions happen?",
                        "options": ["Stroma", "Thylakoid"],
                        "answer": "Thylakoid",
                        "explanation": "The thylakoid membrane hosts the photosystems."
                    }
                ]
            }
        ]
    }"#;

    fn subtopic() -> Subtopic {
        KnowledgeMap::parse(SAMPLE).unwrap().subtopics.remove(0)
    }

    #[test]
    fn parses_sample_with_default_totals() {
        let map = KnowledgeMap::parse(SAMPLE).unwrap();
        assert_eq!(map.topic, "Photosynthesis");
        let sub = &map.subtopics[0];
        assert_eq!(sub.answered, 0);
        assert_eq!(sub.correct, 0);
        assert_eq!(sub.status, MasteryStatus::Unmastered);
        assert_eq!(sub.mastery_percent(), 0);
    }

    #[test]
    fn missing_explanation_is_rejected() {
        let json = SAMPLE.replace(
            "The thylakoid membrane hosts the photosystems.",
            "",
        );
        assert_eq!(
            KnowledgeMap::parse(&json),
            Err(KnowledgeMapError::MissingExplanation {
                subtopic: 0,
                question: 0,
            })
        );
    }

    #[test]
    fn missing_fields_are_json_errors() {
        let err = KnowledgeMap::parse(r#"{"topic": "No subtopics"}"#).unwrap_err();
        assert!(matches!(err, KnowledgeMapError::Json(_)));
    }

    #[test]
    fn unknown_status_reads_as_unmastered() {
        let json = SAMPLE.replace("\"unmastered\"", "\"in progress\"");
        let map = KnowledgeMap::parse(&json).unwrap();
        assert_eq!(map.subtopics[0].status, MasteryStatus::Unmastered);
    }

    #[test]
    fn mastery_needs_accuracy_and_volume() {
        let policy = MasteryPolicy::default();
        let mut sub = subtopic();

        assert_eq!(
            sub.record_quiz(10, 10, &policy).unwrap(),
            MasteryStatus::Unmastered
        );
        assert_eq!(
            sub.record_quiz(90, 72, &policy).unwrap(),
            MasteryStatus::Mastered
        );
        assert_eq!(sub.answered, 100);
        assert_eq!(sub.correct, 82);
        assert_eq!(sub.mastery_percent(), 82);

        assert_eq!(
            sub.record_quiz(100, 60, &policy).unwrap(),
            MasteryStatus::Unmastered
        );
    }

    #[test]
    fn tally_cannot_exceed_answered() {
        let mut sub = subtopic();
        let err = sub
            .record_quiz(2, 3, &MasteryPolicy::default())
            .unwrap_err();
        assert_eq!(
            err,
            KnowledgeMapError::InvalidTally {
                answered: 2,
                correct: 3,
            }
        );
        assert_eq!(sub.answered, 0);
    }

    #[test]
    fn replace_subtopic_matches_by_title() {
        let mut map = KnowledgeMap::parse(SAMPLE).unwrap();
        let mut updated = map.subtopics[0].clone();
        updated.answered = 4;
        updated.correct = 3;

        assert_eq!(map.replace_subtopic(&updated), 1);
        assert_eq!(map.subtopic("Light reactions").unwrap().correct, 3);

        updated.title = "Dark reactions".into();
        assert_eq!(map.replace_subtopic(&updated), 0);
    }

    #[test]
    fn serialized_map_round_trips_totals() {
        let mut map = KnowledgeMap::parse(SAMPLE).unwrap();
        map.subtopics[0].answered = 7;
        let json = map.to_json().unwrap();
        assert!(json.contains("\"answered\":7"));
        assert!(!json.contains("context"));
        assert_eq!(KnowledgeMap::parse(&json).unwrap(), map);
    }

    #[test]
    fn generated_questions_are_validated() {
        let ok = r#"[{"question":"Q?","options":["A","B"],"answer":"B","explanation":"Because."}]"#;
        assert_eq!(parse_generated_questions(ok).unwrap().len(), 1);

        let bad = r#"[{"question":"Q?","options":["A"],"answer":"","explanation":"Because."}]"#;
        let err = parse_generated_questions(bad).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeMapError::InvalidQuestion { index: 0, .. }
        ));

        assert!(matches!(
            parse_generated_questions(r#"{"not":"a list"}"#),
            Err(KnowledgeMapError::Json(_))
        ));
    }
}
