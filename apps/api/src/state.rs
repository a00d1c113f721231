use std::sync::Arc;

use crate::cover_letter::writer::CoverLetterService;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document store. MongoDB in production, in-memory in router tests.
    pub store: Arc<dyn DocumentStore>,
    /// Remote writer with template fallback, or template-only when no API key is set.
    pub cover_letters: Arc<CoverLetterService>,
}
