use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::KnowledgeMap;

/// Points awarded for each correctly answered question.
pub const POINTS_PER_CORRECT: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoadmapError {
    #[error("unknown grade level {value:?} (expected K, 1 or 2)")]
    UnknownGrade { value: String },
}

//
// ─── GRADE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradeLevel {
    #[default]
    Kindergarten,
    First,
    Second,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 3] = [
        GradeLevel::Kindergarten,
        GradeLevel::First,
        GradeLevel::Second,
    ];

    /// Short label used in routes and badges.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GradeLevel::Kindergarten => "K",
            GradeLevel::First => "1",
            GradeLevel::Second => "2",
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = RoadmapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "K" | "k" => Ok(GradeLevel::Kindergarten),
            "1" => Ok(GradeLevel::First),
            "2" => Ok(GradeLevel::Second),
            other => Err(RoadmapError::UnknownGrade {
                value: other.to_string(),
            }),
        }
    }
}

//
// ─── LESSONS ───────────────────────────────────────────────────────────────────
//

/// Where a lesson's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonSource {
    Catalog,
    Subtopic { topic: String, title: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    /// Completion in `[0, 1]`.
    pub progress: f64,
    pub points: u32,
    pub source: LessonSource,
}

impl Lesson {
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.progress > 0.0
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.progress.clamp(0.0, 1.0) * 100.0).round() as u32;
        percent
    }
}

fn catalog_lesson(id: u32, title: &str, progress: f64) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        progress,
        points: 0,
        source: LessonSource::Catalog,
    }
}

//
// ─── ROADMAP ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct Roadmap {
    grade: Option<GradeLevel>,
    lessons: Vec<Lesson>,
}

impl Roadmap {
    /// Built-in lesson path for a grade.
    #[must_use]
    pub fn for_grade(grade: GradeLevel) -> Self {
        let lessons = match grade {
            GradeLevel::Kindergarten => vec![
                catalog_lesson(1, "Letter Sounds", 0.25),
                catalog_lesson(2, "Simple Words", 0.0),
                catalog_lesson(3, "Reading Sentences", 0.0),
            ],
            GradeLevel::First => vec![
                catalog_lesson(1, "Sight Words", 0.0),
                catalog_lesson(2, "Short Stories", 0.0),
                catalog_lesson(3, "Asking Questions", 0.0),
            ],
            GradeLevel::Second => vec![
                catalog_lesson(1, "Main Idea", 0.0),
                catalog_lesson(2, "Story Order", 0.0),
                catalog_lesson(3, "Fact or Opinion", 0.0),
            ],
        };
        Self {
            grade: Some(grade),
            lessons,
        }
    }

    /// One lesson per subtopic, in map order, with progress equal to accuracy.
    #[must_use]
    pub fn from_knowledge_maps(maps: &[KnowledgeMap]) -> Self {
        let lessons = maps
            .iter()
            .flat_map(|map| {
                map.subtopics
                    .iter()
                    .map(move |subtopic| (map.topic.as_str(), subtopic))
            })
            .zip(1..)
            .map(|((topic, subtopic), id)| Lesson {
                id,
                title: subtopic.title.clone(),
                progress: subtopic.accuracy(),
                points: subtopic.correct.saturating_mul(POINTS_PER_CORRECT),
                source: LessonSource::Subtopic {
                    topic: topic.to_string(),
                    title: subtopic.title.clone(),
                },
            })
            .collect();
        Self {
            grade: None,
            lessons,
        }
    }

    #[must_use]
    pub fn grade(&self) -> Option<GradeLevel> {
        self.grade
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.lessons
            .iter()
            .fold(0, |total, lesson| total.saturating_add(lesson.points))
    }

    #[must_use]
    pub fn started_count(&self) -> usize {
        self.lessons.iter().filter(|lesson| lesson.is_started()).count()
    }
}
