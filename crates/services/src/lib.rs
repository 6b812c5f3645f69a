#![forbid(unsafe_code)]

pub mod app_services;
pub mod backend;
pub mod error;
pub mod knowledge_maps;
pub mod practice;
pub mod quiz_loop;

pub use readly_core::Clock;

pub use app_services::AppServices;
pub use backend::{BackendClient, BackendConfig, GenerateQuestionsRequest, HealthStatus, UploadResponse};
pub use error::{AppServicesError, BackendError, KnowledgeMapServiceError, QuizLoopError};
pub use knowledge_maps::{ImportSummary, KnowledgeMapService, StoredMap};
pub use practice::PracticeService;
pub use quiz_loop::{QuizAdvance, QuizLoopService, QuizRun};
