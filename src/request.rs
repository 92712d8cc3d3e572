//! Canonical provider request construction.
//!
//! A request is derived from the fetch-affecting part of a selection (asset
//! and interval) plus the fixed sort order. Date and price bounds are never
//! sent; they are applied locally. Builder methods return `&mut Self` for
//! chaining.
//!
//! # Example
//!
//! ```rust
//! use crypto_dashboard_sdk::models::{Asset, Interval};
//! use crypto_dashboard_sdk::ProviderRequest;
//!
//! let params = ProviderRequest::new(Asset::Btc, Interval::Weekly)
//!     .param("currency", "USD")
//!     .query_pairs();
//! assert!(params.contains(&("coinName".to_string(), "BTC".to_string())));
//! assert!(params.contains(&("interval".to_string(), "weekly".to_string())));
//! ```

use std::fmt;

use serde::Serialize;

use crate::models::{Asset, Interval, Selection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query sent to the price provider for one asset at one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    asset: Asset,
    interval: Interval,
    sort_field: String,
    sort_order: SortOrder,
    extra: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Create a request sorted by date, ascending.
    pub fn new(asset: Asset, interval: Interval) -> Self {
        Self {
            asset,
            interval,
            sort_field: "date".to_string(),
            sort_order: SortOrder::Ascending,
            extra: Vec::new(),
        }
    }

    /// Derive the request for a selection, or `None` when no asset is selected.
    pub fn for_selection(selection: &Selection) -> Option<Self> {
        selection
            .asset
            .map(|asset| Self::new(asset, selection.interval))
    }

    /// Override the sort column and direction.
    pub fn sort_by(&mut self, field: &str, order: SortOrder) -> &mut Self {
        self.sort_field = field.to_string();
        self.sort_order = order;
        self
    }

    /// Append an extra query parameter passed through to the provider as-is.
    pub fn param(&mut self, key: &str, value: &str) -> &mut Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Build the query string parameters, in a stable order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("coinName".to_string(), self.asset.as_str().to_string()),
            ("interval".to_string(), self.interval.as_str().to_string()),
            ("sortColumn".to_string(), self.sort_field.clone()),
            ("sortOrder".to_string(), self.sort_order.as_str().to_string()),
        ];
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}
