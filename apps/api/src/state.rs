use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::recommend::CategoryRecommender;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backing job table. Reload-per-request or cached, chosen at startup.
    pub store: Arc<dyn JobStore>,
    /// Serialises load → append → save for job creation.
    pub write_lock: Arc<Mutex<()>>,
    pub recommender: CategoryRecommender,
    pub config: Config,
}
