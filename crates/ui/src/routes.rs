use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{
    FillBlankView, GradeRoadmapView, GradeSelectView, HomeView, QuizView, RoadmapView,
    SortingView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quiz/:title", QuizView)] Quiz { title: String },
        #[route("/practice/fill-blank", FillBlankView)] FillBlank {},
        #[route("/practice/sorting", SortingView)] Sorting {},
        #[route("/roadmap", RoadmapView)] Roadmap {},
        #[route("/grades", GradeSelectView)] GradeSelect {},
        #[route("/grades/:grade", GradeRoadmapView)] GradeRoadmap { grade: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Readly" }
            ul {
                li { Link { to: Route::Home {}, "Library" } }
                li { Link { to: Route::Roadmap {}, "My Roadmap" } }
                li { Link { to: Route::FillBlank {}, "Fill in the Blanks" } }
                li { Link { to: Route::Sorting {}, "Sorting" } }
                li { Link { to: Route::GradeSelect {}, "Grade Levels" } }
            }
        }
    }
}
