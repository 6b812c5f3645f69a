mod fill_blank;
mod home;
mod quiz;
mod roadmap;
mod sorting;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use fill_blank::FillBlankView;
pub use home::HomeView;
pub use quiz::QuizView;
pub use roadmap::{GradeRoadmapView, GradeSelectView, RoadmapView};
pub use sorting::SortingView;
pub use state::{ViewError, ViewState, view_state_from_resource};
