use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ImportResultVm, KnowledgeMapCardVm, SubtopicCardVm, import_pdf, load_library};

#[derive(Clone, Debug, PartialEq, Eq)]
enum UploadStatus {
    Idle,
    Uploading,
    Done(ImportResultVm),
    Failed(ViewError),
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let knowledge_maps = ctx.knowledge_maps();

    let mut pdf_path = use_signal(String::new);
    let upload_status = use_signal(|| UploadStatus::Idle);

    let maps_for_resource = knowledge_maps.clone();
    let resource = use_resource(move || {
        let maps = maps_for_resource.clone();
        async move { load_library(&maps).await }
    });
    let state = view_state_from_resource(&resource);

    let on_upload = use_callback(move |()| {
        let maps = knowledge_maps.clone();
        let mut upload_status = upload_status;
        let mut resource = resource;
        let path = pdf_path.read().clone();
        if *upload_status.read() == UploadStatus::Uploading {
            return;
        }
        upload_status.set(UploadStatus::Uploading);
        spawn(async move {
            match import_pdf(&maps, &path).await {
                Ok(result) => {
                    upload_status.set(UploadStatus::Done(result));
                    resource.restart();
                }
                Err(err) => upload_status.set(UploadStatus::Failed(err)),
            }
        });
    });

    let uploading = *upload_status.read() == UploadStatus::Uploading;

    rsx! {
        div { class: "page home-page",
            h2 { "Library" }

            section { class: "upload",
                h3 { "Upload a PDF" }
                p { class: "upload-hint", "Readly turns your document into knowledge maps with quizzes." }
                div { class: "upload-row",
                    input {
                        class: "upload-path",
                        r#type: "text",
                        placeholder: "/path/to/document.pdf",
                        value: "{pdf_path}",
                        oninput: move |evt| pdf_path.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: uploading,
                        onclick: move |_| on_upload.call(()),
                        if uploading { "Processing..." } else { "Upload" }
                    }
                }
                match upload_status.read().clone() {
                    UploadStatus::Idle | UploadStatus::Uploading => rsx! {},
                    UploadStatus::Done(result) => rsx! {
                        p { class: "upload-success",
                            "{result.message} ({result.chunks_processed} chunks, {result.loaded} maps)"
                        }
                        if result.skipped > 0 {
                            p { class: "upload-warning", "{result.skipped} maps could not be read." }
                        }
                    },
                    UploadStatus::Failed(err) => rsx! {
                        p { class: "upload-error", "{err.message()}" }
                    },
                }
            }

            section { class: "library",
                match state {
                    ViewState::Idle => rsx! {
                        p { "Idle" }
                    },
                    ViewState::Loading => rsx! {
                        p { "Loading..." }
                    },
                    ViewState::Ready(library) => rsx! {
                        if library.is_empty() {
                            p { class: "library-empty", "No knowledge maps yet. Upload a PDF to get started." }
                        } else {
                            for map in library.maps {
                                MapCard { map }
                            }
                        }
                    },
                    ViewState::Error(err) => rsx! {
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn MapCard(map: KnowledgeMapCardVm) -> Element {
    let total = map.subtopics.len();
    rsx! {
        article { class: "map-card",
            header { class: "map-card__header",
                h3 { "{map.topic}" }
                span { class: "map-card__mastered", "{map.mastered} / {total} mastered" }
            }
            ul { class: "subtopics",
                for subtopic in map.subtopics {
                    SubtopicRow { subtopic }
                }
            }
        }
    }
}

#[component]
fn SubtopicRow(subtopic: SubtopicCardVm) -> Element {
    let status_class = if subtopic.mastered {
        "status status--mastered"
    } else {
        "status"
    };
    rsx! {
        li { class: "subtopic",
            div { class: "subtopic__heading",
                h4 { "{subtopic.title}" }
                span { class: "{status_class}", "{subtopic.status_label}" }
            }
            p { class: "subtopic__description", "{subtopic.description}" }
            if !subtopic.key_concepts.is_empty() {
                p { class: "subtopic__concepts", "Key concepts: {subtopic.key_concepts}" }
            }
            p { class: "subtopic__mastery",
                "Mastery: {subtopic.mastery_percent}% ({subtopic.answered} answered)"
            }
            if subtopic.question_count > 0 {
                Link { class: "btn btn-primary", to: Route::Quiz { title: subtopic.title.clone() },
                    "Start quiz ({subtopic.question_count})"
                }
            } else {
                span { class: "subtopic__empty", "No questions yet" }
            }
        }
    }
}
