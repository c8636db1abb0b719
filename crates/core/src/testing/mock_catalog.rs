//! Mock product catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use crate::catalog::{CatalogError, CatalogQuery, ProductCatalog, ResultItem};

/// Mock implementation of the ProductCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable products (matched by case-insensitive title substring)
/// - Per-query latency, to reorder completions
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use bordados_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.add_product(fixtures::product("Red Shirt")).await;
/// catalog.set_delay("shirt", Duration::from_millis(800)).await;
///
/// let results = catalog.search_products(&CatalogQuery::new("shirt", "us", 6)).await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockCatalog {
    /// Products in catalog order.
    products: Arc<RwLock<Vec<ResultItem>>>,
    /// Latency by exact query text.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Latency for queries without a specific delay.
    default_delay: Arc<RwLock<Duration>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<CatalogQuery>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(Vec::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            default_delay: Arc::new(RwLock::new(Duration::ZERO)),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Product Configuration
    // =========================================================================

    /// Add a product.
    pub async fn add_product(&self, product: ResultItem) {
        self.products.write().await.push(product);
    }

    /// Replace all products.
    pub async fn set_products(&self, products: Vec<ResultItem>) {
        *self.products.write().await = products;
    }

    // =========================================================================
    // Latency Configuration
    // =========================================================================

    /// Delay responses to this exact query text.
    pub async fn set_delay(&self, text: &str, delay: Duration) {
        self.delays.write().await.insert(text.to_string(), delay);
    }

    /// Delay responses to every other query.
    pub async fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.write().await = delay;
    }

    async fn delay_for(&self, text: &str) -> Duration {
        match self.delays.read().await.get(text) {
            Some(delay) => *delay,
            None => *self.default_delay.read().await,
        }
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<CatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Texts of all recorded queries, in call order.
    pub async fn recorded_texts(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .map(|q| q.text.clone())
            .collect()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
    async fn search_products(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<ResultItem>, CatalogError> {
        self.queries.write().await.push(query.clone());

        let delay = self.delay_for(&query.text).await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let text = query.text.to_lowercase();
        let results = self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&text))
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(results)
    }
}
