use serde::Serialize;

use crate::catalog::ResultItem;

/// What the search surface should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum SearchState {
    /// No active query.
    Idle,
    /// A lookup for the current query is in flight.
    Pending,
    /// The last completed lookup returned these products.
    Populated(Vec<ResultItem>),
    /// The last completed lookup matched nothing (or failed).
    Empty,
}

impl SearchState {
    /// Derive the display state. Never stored, always recomputed.
    pub fn derive(query: &str, in_flight: bool, results: &[ResultItem]) -> Self {
        if query.is_empty() {
            SearchState::Idle
        } else if in_flight {
            SearchState::Pending
        } else if results.is_empty() {
            SearchState::Empty
        } else {
            SearchState::Populated(results.to_vec())
        }
    }

    /// Items to render; empty unless populated.
    pub fn items(&self) -> &[ResultItem] {
        match self {
            SearchState::Populated(items) => items,
            _ => &[],
        }
    }
}

/// Everything the rendering surface needs, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSnapshot {
    pub open: bool,
    pub query: String,
    pub state: SearchState,
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self {
            open: false,
            query: String::new(),
            state: SearchState::Idle,
        }
    }
}
