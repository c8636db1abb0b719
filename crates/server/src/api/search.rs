//! Product search proxy handler.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use bordados_core::{CatalogError, CatalogQuery, ResultItem, MAX_RESULT_LIMIT};

use crate::metrics::SEARCH_REQUESTS_TOTAL;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/{country_code}/search?q=..&limit=..
///
/// Look up products matching `q` in the region serving `country_code`.
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Path(country_code): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ResultItem>>, ApiError> {
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("Invalid country code '{}'", country_code),
        ));
    }

    if params.q.is_empty() {
        SEARCH_REQUESTS_TOTAL.with_label_values(&["blank"]).inc();
        return Ok(Json(Vec::new()));
    }

    let limit = params
        .limit
        .unwrap_or(state.config().search.result_limit)
        .clamp(1, MAX_RESULT_LIMIT);
    let query = CatalogQuery::new(params.q, country_code.to_ascii_lowercase(), limit);

    tracing::debug!(
        "Search request: q='{}', country={}, limit={}",
        query.text,
        query.country_code,
        query.limit
    );

    match state.catalog().search_products(&query).await {
        Ok(items) => {
            let result = if items.is_empty() { "no_hits" } else { "hits" };
            SEARCH_REQUESTS_TOTAL.with_label_values(&[result]).inc();
            Ok(Json(items))
        }
        Err(e) => {
            tracing::warn!("Product search for '{}' failed: {}", query.text, e);
            SEARCH_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
            let status = match e {
                CatalogError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err(error(status, e.to_string()))
        }
    }
}
