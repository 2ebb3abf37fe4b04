use std::sync::Arc;

use docgate_core::{backend::DynStoreBackend, orchestrator::QueryOrchestrator};

/// Shared by every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub backend: Arc<dyn DynStoreBackend>,
    pub orchestrator: QueryOrchestrator,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// State with the API-key gate disabled.
    pub fn new(backend: Arc<dyn DynStoreBackend>, orchestrator: QueryOrchestrator) -> Self {
        Self {
            backend,
            orchestrator,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<Arc<str>>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
