use std::sync::Arc;

use crate::config::Config;
use crate::ranker::AdvisoryRanker;

/// Shared application state injected into all route handlers via Axum
/// extractors. Requests share nothing mutable; the ranker's HTTP client
/// supports concurrent in-flight calls.
#[derive(Clone)]
pub struct AppState {
    /// Only `main` reads this today.
    #[allow(dead_code)]
    pub config: Config,
    /// Pluggable advisory ranker. Production: `HttpRanker` against
    /// RANKER_URL; tests swap in mocks.
    pub ranker: Arc<dyn AdvisoryRanker>,
}
