//! Incremental product search.
//!
//! This module provides the debounced search controller behind the
//! storefront's search surface, the listing page's search box, and the
//! navigation seam both of them drive.

mod controller;
mod debounce;
mod navigation;
mod state;
mod store_search;

pub use controller::{SearchController, QUERY_PARAM};
pub use debounce::Debouncer;
pub use navigation::{ChannelNavigator, Destination, Navigator};
pub use state::{SearchSnapshot, SearchState};
pub use store_search::StoreSearch;
