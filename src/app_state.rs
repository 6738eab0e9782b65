//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::EditorService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The editing session every endpoint operates on.
    pub editor: Arc<EditorService>,
}
