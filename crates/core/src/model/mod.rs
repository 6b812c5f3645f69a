mod knowledge_map;
mod question;

pub use knowledge_map::{
    KnowledgeMap, KnowledgeMapError, MasteryPolicy, MasteryStatus, Subtopic,
    parse_generated_questions, validate_generated_questions,
};
pub use question::{FillBlankQuestion, FillBlankQuestionDraft, QuestionError, QuizQuestion};
