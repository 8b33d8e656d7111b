use std::sync::Arc;

use crate::answer::page::PageRenderer;
use crate::answer::AnswerRequester;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the persona table, the completion backend and the credential provider.
    pub requester: Arc<AnswerRequester>,
    /// Compiled page template.
    pub pages: Arc<PageRenderer>,
}
