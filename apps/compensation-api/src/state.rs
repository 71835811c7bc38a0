use std::sync::Arc;

use crate::compensation::{AmazonBands, ReferenceTables};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generic calculator tables. Read-only after startup.
    pub tables: Arc<ReferenceTables>,
    pub amazon: Arc<AmazonBands>,
}
