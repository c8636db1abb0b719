use std::sync::Arc;
use bordados_core::{Config, ProductCatalog, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn ProductCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.catalog.as_ref()
    }
}
