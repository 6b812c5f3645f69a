use dioxus::prelude::*;
use dioxus_router::Link;
use readly_core::quiz::NO_MORE_QUESTIONS;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionState, QuizOutcome, QuizResultsVm, QuizVm, start_quiz};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuizIntent {
    Select(usize),
    Check,
    Next,
    End,
}

#[component]
pub fn QuizView(title: String) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let busy = use_signal(|| false);
    let notice = use_signal(|| None::<String>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let title_for_resource = title.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let title = title_for_resource.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let started = start_quiz(&quiz_loop, &title).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = use_callback(move |intent: QuizIntent| {
        let mut error = error;
        let mut vm = vm;
        let mut busy = busy;
        let mut notice = notice;

        match intent {
            QuizIntent::Select(index) => {
                if let Some(vm) = vm.write().as_mut() {
                    let option = vm.options().get(index).map(|option| option.text.clone());
                    if let Some(option) = option {
                        let _ = vm.select(&option);
                    }
                }
            }
            QuizIntent::Check => {
                if let Some(vm) = vm.write().as_mut() {
                    if let Err(err) = vm.check() {
                        error.set(Some(err));
                    }
                }
            }
            QuizIntent::Next | QuizIntent::End => {
                if busy() {
                    return;
                }
                let quiz_loop = quiz_loop.clone();
                busy.set(true);
                spawn(async move {
                    let Some(mut vm_value) = vm.write().take() else {
                        busy.set(false);
                        error.set(Some(ViewError::Unknown));
                        return;
                    };

                    let result = if intent == QuizIntent::Next {
                        vm_value.next(&quiz_loop).await
                    } else {
                        vm_value.finish(&quiz_loop).await.map(|()| QuizOutcome::Finished)
                    };

                    // Put the quiz back even when the call failed.
                    vm.set(Some(vm_value));
                    busy.set(false);

                    match result {
                        Ok(QuizOutcome::Continue { generated }) => {
                            error.set(None);
                            notice.set(
                                (generated > 0)
                                    .then(|| format!("Added {generated} new questions.")),
                            );
                        }
                        Ok(QuizOutcome::Finished) => {
                            error.set(None);
                            notice.set(None);
                        }
                        Err(err) => error.set(Some(err)),
                    }
                });
            }
        }
    });

    let guard = vm.read();
    let quiz = guard.as_ref();
    let results = quiz.and_then(QuizVm::results).cloned();
    let heading = quiz.map_or_else(|| title.clone(), |quiz| quiz.title().to_string());
    let progress = quiz.map(QuizVm::progress_label).unwrap_or_default();
    let question = quiz.and_then(QuizVm::question_text).map(str::to_string);
    let options = quiz.map(QuizVm::options).unwrap_or_default();
    let verdict = quiz.and_then(QuizVm::verdict);
    let explanation = quiz.and_then(QuizVm::explanation).map(str::to_string);
    let can_check = quiz.is_some_and(QuizVm::can_check);
    let is_checked = quiz.is_some_and(QuizVm::is_checked);
    drop(guard);

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h2 { "{heading}" }
                Link { class: "btn btn-secondary", to: Route::Home {}, "Back to library" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "quiz-empty", "{err.message()}" }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = *error.read() {
                        p { class: "quiz-error", "{err.message()}" }
                    }
                    if let Some(results) = results {
                        QuizSummary { results }
                    } else if let Some(question) = question {
                        p { class: "quiz-progress", "{progress}" }
                        h3 { class: "quiz-question", "{question}" }
                        ul { class: "quiz-options",
                            for (index, option) in options.into_iter().enumerate() {
                                li { key: "{index}",
                                    button {
                                        class: option_class(option.state),
                                        r#type: "button",
                                        disabled: is_checked,
                                        onclick: move |_| dispatch.call(QuizIntent::Select(index)),
                                        "{option.text}"
                                    }
                                }
                            }
                        }
                        if let Some(correct) = verdict {
                            div { class: feedback_class(correct),
                                p { if correct { "Correct!" } else { "Incorrect." } }
                                if let Some(explanation) = explanation {
                                    p { class: "quiz-explanation", "{explanation}" }
                                }
                            }
                        }
                        if let Some(notice) = notice.read().clone() {
                            p { class: "quiz-notice", "{notice}" }
                        }
                        div { class: "quiz-actions",
                            if is_checked {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: busy(),
                                    onclick: move |_| dispatch.call(QuizIntent::Next),
                                    if busy() { "Loading..." } else { "Next" }
                                }
                            } else {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: !can_check,
                                    onclick: move |_| dispatch.call(QuizIntent::Check),
                                    "Check answer"
                                }
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: busy(),
                                onclick: move |_| dispatch.call(QuizIntent::End),
                                "End quiz"
                            }
                        }
                    } else {
                        p { class: "quiz-empty", "{NO_MORE_QUESTIONS}" }
                    }
                },
            }
        }
    }
}

fn option_class(state: OptionState) -> &'static str {
    match state {
        OptionState::Idle => "quiz-option",
        OptionState::Selected => "quiz-option quiz-option--selected",
        OptionState::Correct => "quiz-option quiz-option--correct",
        OptionState::Wrong => "quiz-option quiz-option--wrong",
    }
}

fn feedback_class(correct: bool) -> &'static str {
    if correct {
        "quiz-feedback quiz-feedback--correct"
    } else {
        "quiz-feedback quiz-feedback--wrong"
    }
}

fn review_class(correct: bool) -> &'static str {
    if correct { "review review--correct" } else { "review review--wrong" }
}

#[component]
fn QuizSummary(results: QuizResultsVm) -> Element {
    rsx! {
        section { class: "quiz-summary",
            h3 { "Quiz complete" }
            p { class: "quiz-summary__score", "{results.score_label} ({results.percent}%)" }
            p { class: "quiz-summary__mastery",
                "Overall mastery: {results.mastery_percent}% ({results.status_label})"
            }
            ol { class: "quiz-review",
                for (index, item) in results.review.into_iter().enumerate() {
                    li { key: "{index}", class: review_class(item.correct),
                        p { class: "review__question", "{item.question}" }
                        p { "Your answer: {item.selected}" }
                        if !item.correct {
                            p { "Correct answer: {item.answer}" }
                        }
                        p { class: "review__explanation", "{item.explanation}" }
                    }
                }
            }
            Link { class: "btn btn-primary", to: Route::Home {}, "Back to library" }
        }
    }
}
