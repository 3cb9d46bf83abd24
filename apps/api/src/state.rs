use std::sync::Arc;

use crate::config::Config;
use crate::filler::layout::TemplateLayout;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Template cell layout. Immutable; every request opens its own document.
    pub layout: Arc<TemplateLayout>,
}
