use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The exercise or quiz has nothing to show.
    EmptySession,
    NotFound,
    NotPdf,
    FileUnreadable,
    /// The backend could not be reached or rejected the request.
    Backend,
    InvalidGrade,
    /// Some blanks are still empty.
    BlanksUnfilled,
    /// The current answer has to be checked correct first.
    NotReadyToAdvance,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::EmptySession => readly_core::quiz::NO_MORE_QUESTIONS,
            ViewError::NotFound => "That subtopic could not be found.",
            ViewError::NotPdf => "Only PDF files are supported.",
            ViewError::FileUnreadable => "The file could not be read.",
            ViewError::Backend => "The learning backend is unavailable. Please try again.",
            ViewError::InvalidGrade => "Unknown grade level. Pick K, 1 or 2.",
            ViewError::BlanksUnfilled => "Fill every blank before checking.",
            ViewError::NotReadyToAdvance => "Answer this question correctly to continue.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
