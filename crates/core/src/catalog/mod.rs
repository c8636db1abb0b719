//! Product catalog lookup.
//!
//! This module provides the `ProductCatalog` trait the search controller
//! queries, and a client for the Medusa Store API that implements it.

mod medusa;
mod types;

pub use medusa::MedusaCatalogClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected publishable key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Free-text product lookup scoped to a storefront country.
///
/// Results come back in catalog order and never exceed `query.limit` items.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn search_products(&self, query: &CatalogQuery)
        -> Result<Vec<ResultItem>, CatalogError>;
}
