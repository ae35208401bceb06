use std::sync::Arc;

use sqlx::PgPool;

use crate::career::CareerSuggestionCall;
use crate::config::Config;
use crate::lifecycle::OperationRegistry;
use crate::llm_client::ChatBackend;
use crate::resume::ResumeAnalysisCall;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Feature state (the operation registries) is created here, once, and
/// handed to handlers by reference; there is no process-wide store.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Chat-completion backend. `LlmClient` in production, scripted in tests.
    pub llm: Arc<dyn ChatBackend>,
    pub config: Config,
    pub career: Arc<OperationRegistry<CareerSuggestionCall>>,
    pub resume: Arc<OperationRegistry<ResumeAnalysisCall>>,
}

impl AppState {
    pub fn new(db: PgPool, llm: Arc<dyn ChatBackend>, config: Config) -> Self {
        let career = OperationRegistry::new(
            "career_suggestion",
            CareerSuggestionCall::new(Arc::clone(&llm)),
            config.policies.career,
            config.operation_ttl,
        );
        let resume = OperationRegistry::new(
            "resume_analysis",
            ResumeAnalysisCall::new(Arc::clone(&llm), Some(db.clone())),
            config.policies.resume,
            config.operation_ttl,
        );

        Self {
            db,
            llm,
            config,
            career: Arc::new(career),
            resume: Arc::new(resume),
        }
    }
}
