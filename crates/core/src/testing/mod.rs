//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the catalog and navigation
//! seams, allowing search behaviour to be tested without a Medusa backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use bordados_core::testing::{fixtures, MockCatalog, MockNavigator};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! let navigator = Arc::new(MockNavigator::new());
//!
//! // Configure mock responses
//! catalog.add_product(fixtures::product("Red Shirt")).await;
//!
//! let controller = SearchController::new(catalog.clone(), navigator.clone(), config);
//! ```

mod mock_catalog;
mod mock_navigator;

pub use mock_catalog::MockCatalog;
pub use mock_navigator::MockNavigator;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::ResultItem;
    use crate::config::{CatalogConfig, Config, SearchConfig, ServerConfig};

    /// Create a test product with reasonable defaults.
    pub fn product(title: &str) -> ResultItem {
        let handle = title.to_lowercase().replace(' ', "-");
        ResultItem {
            id: format!("prod_{}", handle),
            handle,
            title: title.to_string(),
            thumbnail: Some(format!("http://localhost:9000/static/{}.png", title.len())),
            collection_title: None,
        }
    }

    /// Create a test product that belongs to a collection.
    pub fn product_in_collection(title: &str, collection: &str) -> ResultItem {
        ResultItem {
            collection_title: Some(collection.to_string()),
            ..product(title)
        }
    }

    /// Create `count` products titled "`prefix` 1", "`prefix` 2", ...
    pub fn products(prefix: &str, count: usize) -> Vec<ResultItem> {
        (1..=count)
            .map(|i| product(&format!("{} {}", prefix, i)))
            .collect()
    }

    /// Search settings with the storefront defaults.
    pub fn search_config() -> SearchConfig {
        SearchConfig::default()
    }

    /// A complete config pointing at a local Medusa backend.
    pub fn config() -> Config {
        Config {
            catalog: CatalogConfig {
                base_url: "http://localhost:9000".to_string(),
                publishable_key: "pk_test".to_string(),
                timeout_secs: 5,
            },
            search: search_config(),
            server: ServerConfig::default(),
        }
    }
}
