//! Crypto dashboard SDK for Rust.
//!
//! Fetches historical price series for a fixed set of coins, narrows them by
//! date range and price range, and summarizes what is left. Changing the coin
//! or the sampling interval asks the provider for new data; changing the
//! bounds only re-filters the series already held.
//!
//! # Quick start
//!
//! ```no_run
//! use crypto_dashboard_sdk::DashboardSdk;
//! use crypto_dashboard_sdk::models::{Asset, Interval};
//!
//! let mut sdk = DashboardSdk::builder().build().unwrap();
//!
//! sdk.select_asset(Asset::Btc);
//! sdk.apply_quick_range(30).unwrap();
//! sdk.set_price_range(Some(20_000.0), None).unwrap();
//!
//! if let Some(stats) = sdk.view().and_then(|v| v.statistics.as_ref()) {
//!     println!("low {} high {}", stats.lowest_price, stats.highest_price);
//! }
//!
//! sdk.set_interval(Interval::Weekly);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod provider;
pub mod request;
pub mod statistics;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncDashboardSdk;
pub use coordinator::{Clock, FetchOutcome, FetchTicket, QueryCoordinator, Reaction};
pub use error::{DashboardError, Result};
pub use provider::{HttpProvider, JsonFileProvider, PriceProvider};
pub use request::{ProviderRequest, SortOrder};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;

use models::{Asset, FilteredView, Interval, Selection, Status};

// ---------------------------------------------------------------------------
// DashboardSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DashboardSdk`] instance.
///
/// Use [`DashboardSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DashboardSdkBuilder::build) to create the SDK.
pub struct DashboardSdkBuilder {
    base_url: String,
    timeout: Duration,
    offline_dir: Option<PathBuf>,
    provider: Option<Box<dyn PriceProvider>>,
    interval: Interval,
    clock: Option<Clock>,
}

impl Default for DashboardSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_API_BASE.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            offline_dir: None,
            provider: None,
            interval: Interval::default(),
            clock: None,
        }
    }
}

impl DashboardSdkBuilder {
    /// Set the dashboard API base URL.
    ///
    /// Defaults to [`config::DEFAULT_API_BASE`].
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set the HTTP request timeout for provider calls.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Serve series from saved JSON files in `dir` instead of the API.
    ///
    /// See [`JsonFileProvider`] for the file naming scheme.
    pub fn offline_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.offline_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Use a custom provider. Takes precedence over `offline_dir` and
    /// `base_url`.
    pub fn provider<P: PriceProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    #[cfg(feature = "async")]
    pub(crate) fn boxed_provider(mut self, provider: Box<dyn PriceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Initial sampling interval. Defaults to daily.
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Override the source of "today" used by quick ranges.
    pub fn clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    fn into_parts(self) -> Result<(QueryCoordinator, Box<dyn PriceProvider>)> {
        let provider: Box<dyn PriceProvider> = match (self.provider, self.offline_dir) {
            (Some(p), _) => p,
            (None, Some(dir)) => Box::new(JsonFileProvider::new(dir)),
            (None, None) => Box::new(HttpProvider::new(&self.base_url, self.timeout)?),
        };

        let mut coordinator = match self.clock {
            Some(clock) => QueryCoordinator::with_clock(clock),
            None => QueryCoordinator::new(),
        };
        // Idle with no asset, so this never issues a fetch.
        coordinator.set_interval(self.interval);

        Ok((coordinator, provider))
    }

    /// Build the SDK.
    ///
    /// No request is made until an asset is selected.
    pub fn build(self) -> Result<DashboardSdk> {
        let (coordinator, provider) = self.into_parts()?;
        Ok(DashboardSdk {
            coordinator,
            provider,
        })
    }
}

// ---------------------------------------------------------------------------
// DashboardSdk
// ---------------------------------------------------------------------------

/// The main entry point: a [`QueryCoordinator`] wired to a [`PriceProvider`].
///
/// Provider calls run synchronously inside the operation that triggered
/// them, so every method returns with the coordinator settled in `Ready`,
/// `Error` or `Idle`. A failed fetch is not an `Err`; it shows up as
/// [`Status::Error`].
pub struct DashboardSdk {
    coordinator: QueryCoordinator,
    provider: Box<dyn PriceProvider>,
}

impl DashboardSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> DashboardSdkBuilder {
        DashboardSdkBuilder::default()
    }

    // -- Selection inputs --------------------------------------------------

    pub fn select_asset(&mut self, asset: Asset) -> &Status {
        let reaction = self.coordinator.select_asset(asset);
        self.dispatch(reaction)
    }

    pub fn set_interval(&mut self, interval: Interval) -> &Status {
        let reaction = self.coordinator.set_interval(interval);
        self.dispatch(reaction)
    }

    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<&Status> {
        let reaction = self.coordinator.set_date_range(start, end)?;
        Ok(self.dispatch(reaction))
    }

    pub fn set_price_range(&mut self, min: Option<f64>, max: Option<f64>) -> Result<&Status> {
        let reaction = self.coordinator.set_price_range(min, max)?;
        Ok(self.dispatch(reaction))
    }

    pub fn apply_quick_range(&mut self, days: u32) -> Result<&Status> {
        let reaction = self.coordinator.apply_quick_range(days)?;
        Ok(self.dispatch(reaction))
    }

    pub fn clear_selection(&mut self) -> &Status {
        let reaction = self.coordinator.clear_selection();
        self.dispatch(reaction)
    }

    /// Fetch the current selection again.
    pub fn refresh(&mut self) -> &Status {
        let reaction = self.coordinator.refresh();
        self.dispatch(reaction)
    }

    // -- Read side ---------------------------------------------------------

    pub fn status(&self) -> &Status {
        self.coordinator.status()
    }

    pub fn selection(&self) -> &Selection {
        self.coordinator.selection()
    }

    pub fn view(&self) -> Option<&FilteredView> {
        self.coordinator.view()
    }

    /// Return a reference to the underlying [`QueryCoordinator`].
    pub fn coordinator(&self) -> &QueryCoordinator {
        &self.coordinator
    }

    /// Split into the coordinator and provider, e.g. to drive them from an
    /// event loop of your own.
    pub fn into_parts(self) -> (QueryCoordinator, Box<dyn PriceProvider>) {
        (self.coordinator, self.provider)
    }

    fn dispatch(&mut self, reaction: Reaction) -> &Status {
        if let Reaction::Fetch(ticket) = reaction {
            let result = self.provider.fetch(&ticket.request);
            self.coordinator.complete_fetch(ticket.id, result);
        }
        self.coordinator.status()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for DashboardSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = self.coordinator.selection();
        write!(
            f,
            "DashboardSdk(asset={}, interval={}, status={}, points={})",
            selection
                .asset
                .map(|a| a.as_str())
                .unwrap_or("none"),
            selection.interval,
            self.coordinator.status(),
            self.view().map(|v| v.series.len()).unwrap_or(0)
        )
    }
}
