use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::backend::{BackendClient, BackendConfig};
use crate::error::AppServicesError;
use crate::knowledge_maps::KnowledgeMapService;
use crate::practice::PracticeService;
use crate::quiz_loop::QuizLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone, Debug)]
pub struct AppServices {
    clock: Clock,
    backend: Arc<BackendClient>,
    knowledge_maps: Arc<KnowledgeMapService>,
    quiz_loop: Arc<QuizLoopService>,
    practice: PracticeService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the HTTP client fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        backend: BackendConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, backend)
    }

    /// Build services over volatile storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn in_memory(clock: Clock, backend: BackendConfig) -> Result<Self, AppServicesError> {
        Self::from_storage(&Storage::in_memory(), clock, backend)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        backend: BackendConfig,
    ) -> Result<Self, AppServicesError> {
        let backend = Arc::new(BackendClient::new(backend)?);
        let knowledge_maps = Arc::new(KnowledgeMapService::new(
            Arc::clone(&storage.kv),
            Arc::clone(&backend),
        ));
        let quiz_loop = Arc::new(QuizLoopService::new(
            Arc::clone(&knowledge_maps),
            Arc::clone(&backend),
        ));
        tracing::info!(backend = %backend.config().base_url, "services ready");

        Ok(Self {
            clock,
            backend,
            knowledge_maps,
            quiz_loop,
            practice: PracticeService::new(clock),
        })
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn backend(&self) -> Arc<BackendClient> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn knowledge_maps(&self) -> Arc<KnowledgeMapService> {
        Arc::clone(&self.knowledge_maps)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn practice(&self) -> PracticeService {
        self.practice
    }
}
