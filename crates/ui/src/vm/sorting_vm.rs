use readly_core::sorting::{SortingError, SortingExercise};
use services::PracticeService;

use crate::views::ViewError;

pub struct SortingVm {
    exercise: SortingExercise,
}

impl SortingVm {
    #[must_use]
    pub fn new(exercise: SortingExercise) -> Self {
        Self { exercise }
    }

    #[must_use]
    pub fn items(&self) -> &[String] {
        self.exercise.items()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&'static str> {
        self.exercise.feedback()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.exercise.feedback().is_some() && self.exercise.is_in_order()
    }

    /// Move the item at `source` to `destination`; `None` means it was dropped
    /// outside the list.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for a stale source index.
    pub fn drop_item(&mut self, source: usize, destination: Option<usize>) -> Result<(), ViewError> {
        self.exercise
            .reorder(source, destination)
            .map_err(|_| ViewError::Unknown)
    }

    pub fn check(&mut self) -> bool {
        self.exercise.check()
    }
}

/// # Errors
///
/// Returns `ViewError::EmptySession` when there is nothing to sort.
pub fn start_sorting(practice: PracticeService, items: Vec<String>) -> Result<SortingVm, ViewError> {
    practice
        .start_sorting(items)
        .map(SortingVm::new)
        .map_err(|err| match err {
            SortingError::Empty => ViewError::EmptySession,
            _ => ViewError::Unknown,
        })
}

#[cfg(test)]
mod tests {
    use readly_core::sorting::{CORRECT_ORDER_FEEDBACK, TRY_AGAIN_FEEDBACK};

    use super::*;

    #[test]
    fn solving_the_list_sets_feedback() {
        let exercise = SortingExercise::new(["a", "b", "c"]).unwrap();
        let mut vm = SortingVm::new(exercise);
        vm.drop_item(0, Some(2)).unwrap();
        assert_eq!(vm.items(), ["b", "c", "a"]);
        assert!(!vm.check());
        assert_eq!(vm.feedback(), Some(TRY_AGAIN_FEEDBACK));

        vm.drop_item(2, Some(0)).unwrap();
        assert!(vm.feedback().is_none());
        assert!(vm.check());
        assert_eq!(vm.feedback(), Some(CORRECT_ORDER_FEEDBACK));
        assert!(vm.is_solved());
    }

    #[test]
    fn empty_list_cannot_start() {
        let err = start_sorting(PracticeService::default(), Vec::new()).err();
        assert_eq!(err, Some(ViewError::EmptySession));
    }
}
