//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock catalog injected, so the HTTP surface can be exercised without
//! a Medusa backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bordados_core::{testing::MockCatalog, Config, ProductCatalog};

/// Re-export fixtures for test convenience
pub use bordados_core::testing::fixtures;

/// Test fixture for API testing with a mock catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.add_product(fixtures::product("Red Shirt")).await;
///
///     let response = fixture.get("/api/v1/us/search?q=shirt").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure products, latency and failures
    pub catalog: Arc<MockCatalog>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with the default test config.
    pub async fn new() -> Self {
        Self::with_config(fixtures::config()).await
    }

    /// Create a test fixture with a custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let catalog = Arc::new(MockCatalog::new());

        let state = Arc::new(bordados_server::state::AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn ProductCatalog>,
        ));
        let router = bordados_server::api::create_router(state);

        Self { router, catalog }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            $response.text
        );
    };
}
