use std::sync::Arc;

use crate::assessment::catalog::FieldCatalog;
use crate::assessment::provider::JudgmentProvider;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable judgment provider. Default: LlmJudgmentProvider.
    pub provider: Arc<dyn JudgmentProvider>,
    /// Field catalog built once at startup; never mutated.
    pub catalog: Arc<FieldCatalog>,
    pub config: Config,
}
