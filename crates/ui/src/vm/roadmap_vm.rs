use readly_core::roadmap::{GradeLevel, LessonSource, Roadmap};

use services::KnowledgeMapService;

use crate::views::ViewError;
use crate::vm::map_knowledge_map_error;

/// Vertical distance between lesson nodes.
pub const NODE_SPACING_PX: f64 = 130.0;
const WAVE_AMPLITUDE_PX: f64 = 30.0;
const WAVE_STEP: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct LessonNodeVm {
    pub id: u32,
    pub title: String,
    pub progress_percent: u32,
    pub points: u32,
    pub started: bool,
    /// Subtopic whose quiz this lesson opens, if any.
    pub quiz_title: Option<String>,
    pub style: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoadmapVm {
    pub heading: String,
    pub points_label: String,
    pub started_label: String,
    pub nodes: Vec<LessonNodeVm>,
    pub path_style: String,
}

impl RoadmapVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// `(top, horizontal offset)` of the node at `index` on the winding path.
#[must_use]
pub fn node_position(index: usize) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let step = index as f64;
    (step * NODE_SPACING_PX, WAVE_AMPLITUDE_PX * (step * WAVE_STEP).sin())
}

#[must_use]
pub fn map_roadmap(roadmap: &Roadmap) -> RoadmapVm {
    let heading = roadmap.grade().map_or_else(
        || "My Roadmap".to_string(),
        |grade| format!("Grade {grade} Roadmap"),
    );
    let nodes: Vec<LessonNodeVm> = roadmap
        .lessons()
        .iter()
        .enumerate()
        .map(|(index, lesson)| {
            let (top, offset) = node_position(index);
            LessonNodeVm {
                id: lesson.id,
                title: lesson.title.clone(),
                progress_percent: lesson.progress_percent(),
                points: lesson.points,
                started: lesson.is_started(),
                quiz_title: match &lesson.source {
                    LessonSource::Subtopic { title, .. } => Some(title.clone()),
                    LessonSource::Catalog => None,
                },
                style: format!("top: {top:.0}px; transform: translateX({offset:.1}px);"),
            }
        })
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let height = nodes.len() as f64 * NODE_SPACING_PX;

    RoadmapVm {
        heading,
        points_label: format!("{} points", roadmap.points()),
        started_label: format!("{} of {} lessons started", roadmap.started_count(), nodes.len()),
        nodes,
        path_style: format!("height: {height:.0}px;"),
    }
}

/// # Errors
///
/// Returns `ViewError::InvalidGrade` for anything but K, 1 or 2.
pub fn grade_roadmap(grade: &str) -> Result<RoadmapVm, ViewError> {
    let grade: GradeLevel = grade.parse().map_err(|_| ViewError::InvalidGrade)?;
    Ok(map_roadmap(&Roadmap::for_grade(grade)))
}

/// Roadmap built from the learner's own knowledge maps.
///
/// # Errors
///
/// Returns `ViewError::Unknown` when the maps cannot be loaded.
pub async fn load_roadmap(maps: &KnowledgeMapService) -> Result<RoadmapVm, ViewError> {
    let roadmap = maps.roadmap().await.map_err(|err| {
        tracing::warn!(error = %err, "failed to build roadmap");
        map_knowledge_map_error(&err)
    })?;
    Ok(map_roadmap(&roadmap))
}
