use dioxus::prelude::*;
use services::practice::sample_sorting_items;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::start_sorting;

#[component]
pub fn SortingView() -> Element {
    let ctx = use_context::<AppContext>();
    let practice = ctx.practice();

    let mut vm = use_signal(move || start_sorting(practice, sample_sorting_items()));
    let mut dragging = use_signal(|| None::<usize>);

    let mut drop_at = move |destination: Option<usize>| {
        let Some(source) = dragging.write().take() else {
            return;
        };
        if let Ok(vm) = vm.write().as_mut() {
            let _ = vm.drop_item(source, destination);
        }
    };

    let snapshot: Result<(Vec<String>, Option<&'static str>, bool), ViewError> =
        match &*vm.read() {
            Ok(sorting) => Ok((
                sorting.items().to_vec(),
                sorting.feedback(),
                sorting.is_solved(),
            )),
            Err(err) => Err(*err),
        };

    rsx! {
        div { class: "page sorting-page",
            h2 { "Sorting" }
            p { class: "sorting-hint", "Drag the items into the right order, then check." }
            match snapshot {
                Err(err) => rsx! {
                    p { "{err.message()}" }
                },
                Ok((items, feedback, solved)) => rsx! {
                    ol { class: "sorting-list",
                        for (index, item) in items.into_iter().enumerate() {
                            li {
                                key: "{item}",
                                class: "sorting-item",
                                draggable: !solved,
                                ondragstart: move |_| dragging.set(Some(index)),
                                ondragover: move |evt: DragEvent| evt.prevent_default(),
                                ondrop: move |evt: DragEvent| {
                                    evt.prevent_default();
                                    drop_at(Some(index));
                                },
                                ondragend: move |_| drop_at(None),
                                "{item}"
                            }
                        }
                    }
                    if let Some(message) = feedback {
                        p { class: feedback_class(solved), "{message}" }
                    }
                    div { class: "exercise-actions",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: solved,
                            onclick: move |_| {
                                if let Ok(vm) = vm.write().as_mut() {
                                    vm.check();
                                }
                            },
                            "Check order"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                dragging.set(None);
                                vm.set(start_sorting(practice, sample_sorting_items()));
                            },
                            "Shuffle"
                        }
                    }
                },
            }
        }
    }
}

fn feedback_class(solved: bool) -> &'static str {
    if solved {
        "feedback feedback--correct"
    } else {
        "feedback feedback--wrong"
    }
}
