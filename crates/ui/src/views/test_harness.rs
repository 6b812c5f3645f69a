use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use readly_core::time::fixed_clock;
use services::{
    AppServices, BackendConfig, Clock, KnowledgeMapService, PracticeService, QuizLoopService,
};
use storage::repository::{KNOWLEDGE_MAPS_KEY, KeyValueRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{
    FillBlankView, GradeRoadmapView, GradeSelectView, HomeView, QuizView, RoadmapView,
    SortingView,
};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn knowledge_maps(&self) -> Arc<KnowledgeMapService> {
        self.services.knowledge_maps()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn practice(&self) -> PracticeService {
        self.services.practice()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz(String),
    FillBlank,
    Sorting,
    Roadmap,
    GradeSelect,
    GradeRoadmap(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quiz(title) => rsx! { QuizView { title } },
        ViewKind::FillBlank => rsx! { FillBlankView {} },
        ViewKind::Sorting => rsx! { SortingView {} },
        ViewKind::Roadmap => rsx! { RoadmapView {} },
        ViewKind::GradeSelect => rsx! { GradeSelectView {} },
        ViewKind::GradeRoadmap(grade) => rsx! { GradeRoadmapView { grade } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, documents: &[&str]) -> ViewHarness {
    let storage = Storage::in_memory();
    let collection = serde_json::to_string(documents).expect("serialize documents");
    storage
        .kv
        .put_value(KNOWLEDGE_MAPS_KEY, &collection)
        .await
        .expect("seed knowledge maps");
    setup_view_harness_with_storage(view, storage)
}

pub fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let services = AppServices::from_storage(&storage, fixed_clock(), BackendConfig::default())
        .expect("build services");
    let app = Arc::new(TestApp { services });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, storage }
}
