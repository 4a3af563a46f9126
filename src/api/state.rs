//! Application state for the API server

use crate::config::Config;
use crate::service::ExtractionService;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (cheap Arc clones); all real state lives behind the
/// extraction service.
#[derive(Clone)]
pub struct AppState {
    /// The extraction service every handler routes through
    pub service: Arc<ExtractionService>,

    /// Configuration, for read access
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<ExtractionService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
