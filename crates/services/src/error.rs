//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use readly_core::model::KnowledgeMapError;
use readly_core::quiz::QuizError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `BackendClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("only PDF files are supported: {file_name}")]
    NotPdf { file_name: String },
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("backend returned invalid questions: {0}")]
    InvalidQuestions(#[source] KnowledgeMapError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `KnowledgeMapService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KnowledgeMapServiceError {
    #[error("stored knowledge map collection is not a JSON array of documents: {0}")]
    CorruptCollection(String),
    #[error("no subtopic titled {title:?}")]
    SubtopicNotFound { title: String },
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    KnowledgeMap(#[from] KnowledgeMapError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Maps(#[from] KnowledgeMapServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
