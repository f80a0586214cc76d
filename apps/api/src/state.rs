use std::sync::Arc;

use crate::analysis::Lexicon;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Linguistic model for keyword matching. Loaded once, never mutated.
    pub lexicon: Arc<Lexicon>,
}
