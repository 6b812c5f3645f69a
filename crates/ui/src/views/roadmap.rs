use dioxus::prelude::*;
use dioxus_router::Link;
use readly_core::roadmap::GradeLevel;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{LessonNodeVm, RoadmapVm, grade_roadmap, load_roadmap};

/// Lessons derived from the learner's knowledge maps.
#[component]
pub fn RoadmapView() -> Element {
    let ctx = use_context::<AppContext>();
    let maps = ctx.knowledge_maps();

    let resource = use_resource(move || {
        let maps = maps.clone();
        async move { load_roadmap(&maps).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page roadmap-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(roadmap) => rsx! {
                    if roadmap.is_empty() {
                        h2 { "{roadmap.heading}" }
                        p { "Upload a PDF to build your roadmap." }
                        Link { class: "btn btn-primary", to: Route::Home {}, "Go to library" }
                    } else {
                        RoadmapPath { roadmap }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
pub fn GradeSelectView() -> Element {
    rsx! {
        div { class: "page grade-select-page",
            h2 { "Choose your grade" }
            div { class: "grade-grid",
                for grade in GradeLevel::ALL {
                    Link {
                        class: "grade-card",
                        to: Route::GradeRoadmap { grade: grade.as_str().to_string() },
                        span { class: "grade-card__label", "{grade_title(grade)}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn GradeRoadmapView(grade: String) -> Element {
    rsx! {
        div { class: "page roadmap-page",
            match grade_roadmap(&grade) {
                Ok(roadmap) => rsx! {
                    RoadmapPath { roadmap }
                },
                Err(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::GradeSelect {}, "Choose a grade" }
                },
            }
        }
    }
}

fn grade_title(grade: GradeLevel) -> &'static str {
    match grade {
        GradeLevel::Kindergarten => "Kindergarten",
        GradeLevel::First => "Grade 1",
        GradeLevel::Second => "Grade 2",
    }
}

#[component]
fn RoadmapPath(roadmap: RoadmapVm) -> Element {
    rsx! {
        header { class: "roadmap-header",
            h2 { "{roadmap.heading}" }
            span { class: "roadmap-points", "{roadmap.points_label}" }
            span { class: "roadmap-started", "{roadmap.started_label}" }
        }
        div { class: "roadmap-path", style: "{roadmap.path_style}",
            for node in roadmap.nodes {
                LessonNode { key: "{node.id}", node }
            }
        }
    }
}

#[component]
fn LessonNode(node: LessonNodeVm) -> Element {
    let class = if node.started {
        "lesson-node lesson-node--started"
    } else {
        "lesson-node"
    };
    rsx! {
        div { class: "{class}", style: "{node.style}",
            div { class: "lesson-node__circle", "{node.id}" }
            div { class: "lesson-node__body",
                p { class: "lesson-node__title", "{node.title}" }
                div { class: "lesson-node__progress",
                    div {
                        class: "lesson-node__bar",
                        style: "width: {node.progress_percent}%;",
                    }
                }
                p { class: "lesson-node__meta", "{node.progress_percent}% · {node.points} pts" }
                if let Some(title) = node.quiz_title.clone() {
                    Link { class: "btn btn-primary", to: Route::Quiz { title }, "Practice" }
                }
            }
        }
    }
}
