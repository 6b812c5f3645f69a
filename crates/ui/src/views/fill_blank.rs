use dioxus::prelude::*;
use readly_core::exercise::{DropZone, ExerciseScore};
use services::practice::sample_fill_blank_questions;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState};
use crate::vm::{DragSource, FillBlankOutcome, FillBlankVm, SentenceSegment, start_fill_blank};

#[derive(Clone, Debug, PartialEq, Eq)]
enum FillBlankIntent {
    Drop {
        destination: Option<DropZone>,
        index: usize,
    },
    Check,
    Advance,
    Restart,
}

fn start(ctx: &AppContext) -> Result<FillBlankVm, ViewError> {
    let questions = sample_fill_blank_questions().map_err(|_| ViewError::Unknown)?;
    start_fill_blank(ctx.practice(), questions)
}

#[component]
pub fn FillBlankView() -> Element {
    let ctx = use_context::<AppContext>();

    let ctx_for_start = ctx.clone();
    let mut vm = use_signal(move || start(&ctx_for_start));
    let dragging = use_signal(|| None::<DragSource>);
    let completed = use_signal(|| None::<ExerciseScore>);

    let dispatch = use_callback(move |intent: FillBlankIntent| {
        let mut dragging = dragging;
        let mut completed = completed;

        match intent {
            FillBlankIntent::Drop { destination, index } => {
                let Some(source) = dragging.write().take() else {
                    return;
                };
                if let Ok(vm) = vm.write().as_mut() {
                    let _ = vm.drop_item(&source, destination, index);
                }
            }
            FillBlankIntent::Check => {
                if let Ok(vm) = vm.write().as_mut() {
                    if let Err(err) = vm.check() {
                        tracing::debug!(?err, "check rejected");
                    }
                }
            }
            FillBlankIntent::Advance => {
                if let Ok(vm) = vm.write().as_mut() {
                    match vm.advance() {
                        Ok(FillBlankOutcome::Completed(score)) => completed.set(Some(score)),
                        Ok(FillBlankOutcome::Continue) => {}
                        Err(err) => tracing::debug!(?err, "advance rejected"),
                    }
                }
            }
            FillBlankIntent::Restart => {
                dragging.set(None);
                completed.set(None);
                vm.set(start(&ctx));
            }
        }
    });

    let state = match &*vm.read() {
        Ok(_) => ViewState::Ready(()),
        Err(err) => ViewState::Error(*err),
    };

    rsx! {
        div { class: "page fill-blank-page",
            h2 { "Fill in the Blanks" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(score) = completed() {
                        section { class: "exercise-complete",
                            h3 { "Exercise complete" }
                            p { "You scored {score.score} out of {score.total_questions}." }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| dispatch.call(FillBlankIntent::Restart),
                                "Try again"
                            }
                        }
                    } else {
                        ExerciseBody { vm, dragging, dispatch }
                    }
                },
            }
        }
    }
}

#[component]
fn ExerciseBody(
    vm: Signal<Result<FillBlankVm, ViewError>>,
    dragging: Signal<Option<DragSource>>,
    dispatch: Callback<FillBlankIntent>,
) -> Element {
    let guard = vm.read();
    let Ok(exercise) = guard.as_ref() else {
        return rsx! {};
    };
    let progress = exercise.progress_label();
    let score = exercise.score_label();
    let segments = exercise.segments();
    let pool = exercise.pool().to_vec();
    let feedback = exercise.feedback();
    let can_check = exercise.can_check();
    let can_advance = exercise.can_advance();
    let can_drag = exercise.can_drag();
    let next_label = if exercise.is_last_question() { "Finish" } else { "Next" };
    drop(guard);

    let pool_len = pool.len();
    let feedback_class = if can_advance {
        "feedback feedback--correct"
    } else {
        "feedback feedback--wrong"
    };

    rsx! {
        div { class: "exercise",
            div { class: "exercise-status",
                span { "{progress}" }
                span { "{score}" }
            }
            p { class: "sentence",
                for (position, segment) in segments.into_iter().enumerate() {
                    match segment {
                        SentenceSegment::Text(text) => rsx! {
                            span { key: "t{position}", "{text}" }
                        },
                        SentenceSegment::Blank { index, value, correct } => rsx! {
                            BlankSlot { key: "b{index}", index, value, correct, can_drag, dragging, dispatch }
                        },
                    }
                }
            }
            div {
                class: "pool",
                ondragover: move |evt: DragEvent| evt.prevent_default(),
                ondrop: move |evt: DragEvent| {
                    evt.prevent_default();
                    dispatch.call(FillBlankIntent::Drop {
                        destination: Some(DropZone::Pool),
                        index: pool_len,
                    });
                },
                for (index, item) in pool.into_iter().enumerate() {
                    span {
                        key: "{index}-{item}",
                        class: "chip",
                        draggable: can_drag,
                        ondragstart: {
                            let item = item.clone();
                            move |_| {
                                let mut dragging = dragging;
                                dragging.set(Some(DragSource::from_pool(item.clone(), index)));
                            }
                        },
                        ondragover: move |evt: DragEvent| evt.prevent_default(),
                        ondrop: move |evt: DragEvent| {
                            evt.prevent_default();
                            evt.stop_propagation();
                            dispatch.call(FillBlankIntent::Drop {
                                destination: Some(DropZone::Pool),
                                index,
                            });
                        },
                        ondragend: move |_| {
                            dispatch.call(FillBlankIntent::Drop { destination: None, index: 0 });
                        },
                        "{item}"
                    }
                }
            }
            if let Some(message) = feedback {
                p { class: "{feedback_class}", "{message}" }
            }
            div { class: "exercise-actions",
                if can_advance {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| dispatch.call(FillBlankIntent::Advance),
                        "{next_label}"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !can_check,
                        onclick: move |_| dispatch.call(FillBlankIntent::Check),
                        "Check"
                    }
                }
            }
        }
    }
}

#[component]
fn BlankSlot(
    index: usize,
    value: Option<String>,
    correct: Option<bool>,
    can_drag: bool,
    dragging: Signal<Option<DragSource>>,
    dispatch: Callback<FillBlankIntent>,
) -> Element {
    let class = match correct {
        Some(true) => "blank blank--correct",
        Some(false) => "blank blank--wrong",
        None if value.is_some() => "blank blank--filled",
        None => "blank",
    };
    let drop_here = move |evt: DragEvent| {
        evt.prevent_default();
        evt.stop_propagation();
        dispatch.call(FillBlankIntent::Drop {
            destination: Some(DropZone::Blank(index)),
            index: 0,
        });
    };

    rsx! {
        span {
            class: "{class}",
            ondragover: move |evt: DragEvent| evt.prevent_default(),
            ondrop: drop_here,
            match value {
                Some(item) => rsx! {
                    span {
                        class: "chip chip--placed",
                        draggable: can_drag,
                        ondragstart: {
                            let item = item.clone();
                            move |_| {
                                let mut dragging = dragging;
                                dragging.set(Some(DragSource::from_blank(item.clone(), index)));
                            }
                        },
                        ondragend: move |_| {
                            dispatch.call(FillBlankIntent::Drop { destination: None, index: 0 });
                        },
                        "{item}"
                    }
                },
                None => rsx! {
                    span { class: "blank__placeholder" }
                },
            }
        }
    }
}
