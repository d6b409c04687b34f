use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, role templates and tuning. Immutable after startup, so handlers
    /// read it concurrently without locking.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
