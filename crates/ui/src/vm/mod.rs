mod fill_blank_vm;
mod knowledge_map_vm;
mod quiz_vm;
mod roadmap_vm;
mod sorting_vm;

pub use fill_blank_vm::{
    DragSource, FillBlankOutcome, FillBlankVm, SentenceSegment, start_fill_blank,
};
pub use knowledge_map_vm::{
    ImportResultVm, KnowledgeMapCardVm, LibraryVm, SubtopicCardVm, import_pdf, load_library,
    map_knowledge_map_error, map_library,
};
pub use quiz_vm::{
    OptionState, QuizOptionVm, QuizOutcome, QuizResultsVm, QuizVm, ReviewItemVm,
    map_quiz_results, start_quiz,
};
pub use roadmap_vm::{
    LessonNodeVm, NODE_SPACING_PX, RoadmapVm, grade_roadmap, load_roadmap, map_roadmap, node_position,
};
pub use sorting_vm::{SortingVm, start_sorting};
