//! Medusa Store API client.
//!
//! Products are looked up through `GET /store/products`, which needs a region
//! id for pricing. Storefront URLs carry a country code instead, so the client
//! resolves countries to regions via `GET /store/regions` and caches the map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::types::{CatalogQuery, ResultItem};
use super::{CatalogError, ProductCatalog};
use crate::config::CatalogConfig;
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

/// Header carrying the storefront's publishable key.
const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Product fields requested for search results.
const PRODUCT_FIELDS: &str = "id,title,handle,thumbnail,*collection";

/// Medusa Store API client.
pub struct MedusaCatalogClient {
    client: Client,
    base_url: String,
    publishable_key: String,
    /// Lowercase country code -> region id, filled on first use.
    regions: RwLock<Option<HashMap<String, String>>>,
}

impl MedusaCatalogClient {
    /// Create a new Medusa client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        if config.publishable_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "Medusa publishable key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            publishable_key: config.publishable_key,
            regions: RwLock::new(None),
        })
    }

    /// Resolve a storefront country to its Medusa region id.
    ///
    /// Hits are served from the cache. A miss refetches the region list once
    /// and replaces the cache, so regions added after startup are picked up.
    /// Returns `Ok(None)` when no region serves the country.
    pub async fn region_id(&self, country_code: &str) -> Result<Option<String>, CatalogError> {
        let code = country_code.to_ascii_lowercase();

        if let Some(region_id) = self
            .regions
            .read()
            .await
            .as_ref()
            .and_then(|map| map.get(&code).cloned())
        {
            return Ok(Some(region_id));
        }

        let map = self.fetch_regions().await?;
        let region_id = map.get(&code).cloned();
        *self.regions.write().await = Some(map);

        Ok(region_id)
    }

    async fn fetch_regions(&self) -> Result<HashMap<String, String>, CatalogError> {
        let url = format!("{}/store/regions", self.base_url);

        debug!("Medusa region list: url='{}'", url);

        let start = Instant::now();
        let result = async {
            let response = self
                .client
                .get(&url)
                .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
                .send()
                .await?;

            let response = check_status(response).await?;

            response
                .json::<MedusaRegionsResponse>()
                .await
                .map_err(|e| {
                    CatalogError::ParseError(format!("Failed to parse regions response: {}", e))
                })
        }
        .await;
        record_request("list_regions", start, result.is_ok());

        let mut map = HashMap::new();
        for region in result?.regions {
            for country in region.countries {
                map.insert(country.iso_2.to_ascii_lowercase(), region.id.clone());
            }
        }

        debug!("Medusa regions resolved: {} countries", map.len());
        Ok(map)
    }

    async fn list_products(
        &self,
        query: &CatalogQuery,
        region_id: &str,
    ) -> Result<Vec<ResultItem>, CatalogError> {
        let url = format!("{}/store/products", self.base_url);
        let limit = query.limit.to_string();

        let response = self
            .client
            .get(&url)
            .header(PUBLISHABLE_KEY_HEADER, &self.publishable_key)
            .query(&[
                ("q", query.text.as_str()),
                ("limit", limit.as_str()),
                ("region_id", region_id),
                ("fields", PRODUCT_FIELDS),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;

        let body: MedusaProductsResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse products response: {}", e))
        })?;

        Ok(body
            .products
            .into_iter()
            .take(query.limit as usize)
            .map(|p| p.into())
            .collect())
    }
}

#[async_trait]
impl ProductCatalog for MedusaCatalogClient {
    async fn search_products(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<ResultItem>, CatalogError> {
        let Some(region_id) = self.region_id(&query.country_code).await? else {
            warn!(
                "No Medusa region serves country '{}', returning no products",
                query.country_code
            );
            return Ok(Vec::new());
        };

        debug!(
            "Medusa product search: q='{}', region={}, limit={}",
            query.text, region_id, query.limit
        );

        let start = Instant::now();
        let result = self.list_products(query, &region_id).await;
        record_request("search_products", start, result.is_ok());

        result
    }
}

/// Map non-success statuses to catalog errors.
async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status == 401 || status == 403 {
        return Err(CatalogError::NotConfigured(
            "Medusa rejected the publishable key".to_string(),
        ));
    }
    if status == 429 {
        warn!("Medusa rate limit exceeded");
        return Err(CatalogError::RateLimitExceeded);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

fn record_request(operation: &str, start: Instant, success: bool) {
    let status = if success { "success" } else { "error" };
    CATALOG_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());
    CATALOG_REQUESTS
        .with_label_values(&[operation, status])
        .inc();
}

// ============================================================================
// Medusa API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MedusaRegionsResponse {
    regions: Vec<MedusaRegion>,
}

#[derive(Debug, Deserialize)]
struct MedusaRegion {
    id: String,
    #[serde(default)]
    countries: Vec<MedusaCountry>,
}

#[derive(Debug, Deserialize)]
struct MedusaCountry {
    iso_2: String,
}

#[derive(Debug, Deserialize)]
struct MedusaProductsResponse {
    products: Vec<MedusaProduct>,
}

#[derive(Debug, Deserialize)]
struct MedusaProduct {
    id: String,
    title: String,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    collection: Option<MedusaCollection>,
}

#[derive(Debug, Deserialize)]
struct MedusaCollection {
    title: String,
}

impl From<MedusaProduct> for ResultItem {
    fn from(p: MedusaProduct) -> Self {
        Self {
            id: p.id,
            handle: p.handle.unwrap_or_default(),
            title: p.title,
            thumbnail: p.thumbnail.filter(|t| !t.is_empty()),
            collection_title: p.collection.map(|c| c.title),
        }
    }
}
