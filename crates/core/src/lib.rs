pub mod catalog;
pub mod config;
pub mod metrics;
pub mod search;
pub mod testing;

pub use catalog::{CatalogError, CatalogQuery, MedusaCatalogClient, ProductCatalog, ResultItem};
pub use config::{
    config_path, load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    SanitizedConfig, SearchConfig, ServerConfig, MAX_RESULT_LIMIT,
};
pub use search::{
    ChannelNavigator, Debouncer, Destination, Navigator, SearchController, SearchSnapshot,
    SearchState, StoreSearch,
};
