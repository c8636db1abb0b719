//! Types shared by catalog clients and the search controller.

use serde::{Deserialize, Serialize};

/// A product lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Free text as typed by the shopper.
    pub text: String,
    /// Storefront country (ISO 3166-1 alpha-2), resolved to a region by the catalog.
    pub country_code: String,
    /// Maximum number of products to return.
    pub limit: u32,
}

impl CatalogQuery {
    pub fn new(text: impl Into<String>, country_code: impl Into<String>, limit: u32) -> Self {
        Self {
            text: text.into(),
            country_code: country_code.into(),
            limit,
        }
    }
}

/// Read-only projection of a catalog product, as shown in search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultItem {
    /// Product identifier (e.g. `prod_01H...`).
    pub id: String,
    /// URL handle used to link to the product page.
    pub handle: String,
    /// Display title.
    pub title: String,
    /// Thumbnail image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Title of the collection the product belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_title: Option<String>,
}

impl ResultItem {
    /// Storefront path of the product page for the given country.
    pub fn product_path(&self, country_code: &str) -> String {
        format!(
            "/{}/products/{}",
            country_code,
            urlencoding::encode(&self.handle)
        )
    }
}
