use std::sync::Arc;

use crate::backend::HrBackend;
use crate::config::Config;
use crate::ranking::workspace::RankingWorkspace;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every remote call goes through this. `HrApiClient` in production.
    pub backend: Arc<dyn HrBackend>,
    pub session: SessionStore,
    /// The recruiter's current result set and view state.
    pub workspace: RankingWorkspace,
    pub config: Config,
}

impl AppState {
    pub fn new(backend: Arc<dyn HrBackend>, config: Config) -> Self {
        Self {
            backend,
            session: SessionStore::default(),
            workspace: RankingWorkspace::new(config.default_page_size),
            config,
        }
    }
}
