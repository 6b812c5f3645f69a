use std::sync::Arc;

use services::{Clock, KnowledgeMapService, PracticeService, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;

    fn knowledge_maps(&self) -> Arc<KnowledgeMapService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn practice(&self) -> PracticeService;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,

    knowledge_maps: Arc<KnowledgeMapService>,
    quiz_loop: Arc<QuizLoopService>,
    practice: PracticeService,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            knowledge_maps: app.knowledge_maps(),
            quiz_loop: app.quiz_loop(),
            practice: app.practice(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
