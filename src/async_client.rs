//! Async wrapper around the query coordinator for use in async runtimes
//! (Tokio, etc.).
//!
//! Provider calls run on a blocking thread pool via
//! [`tokio::task::spawn_blocking`]; the coordinator itself sits behind a
//! [`Mutex`] that is only held for synchronous coordinator calls, never across
//! an `.await`. Several selections can therefore be in flight at once, and
//! only the response for the latest one is applied.
//!
//! # Example
//!
//! ```no_run
//! use crypto_dashboard_sdk::AsyncDashboardSdk;
//! use crypto_dashboard_sdk::models::Asset;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncDashboardSdk::builder().build().await.unwrap();
//!
//!     sdk.select_asset(Asset::Eth).await.unwrap();
//!     sdk.set_price_range(Some(1_500.0), Some(4_000.0)).await.unwrap();
//!
//!     let stats = sdk
//!         .run(|c| c.view().and_then(|v| v.statistics.clone()))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;

use crate::coordinator::{Clock, QueryCoordinator, Reaction};
use crate::error::{DashboardError, Result};
use crate::models::{Asset, Interval, Status};
use crate::provider::PriceProvider;
use crate::DashboardSdk;

// ---------------------------------------------------------------------------
// AsyncDashboardSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDashboardSdk`] instance.
#[derive(Default)]
pub struct AsyncDashboardSdkBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    offline_dir: Option<PathBuf>,
    provider: Option<Box<dyn PriceProvider>>,
    interval: Interval,
    clock: Option<Clock>,
}

impl AsyncDashboardSdkBuilder {
    /// Set the dashboard API base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout for provider calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Serve series from saved JSON files in `dir` instead of the API.
    pub fn offline_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.offline_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Use a custom provider.
    pub fn provider<P: PriceProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Initial sampling interval.
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

    /// Build the async SDK.
    ///
    /// The blocking HTTP client is created on the blocking thread pool so it
    /// won't block the async event loop.
    pub async fn build(self) -> Result<AsyncDashboardSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = DashboardSdk::builder().interval(self.interval);
            if let Some(url) = self.base_url {
                builder = builder.base_url(&url);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(dir) = self.offline_dir {
                builder = builder.offline_dir(dir);
            }
            if let Some(provider) = self.provider {
                builder = builder.boxed_provider(provider);
            }
            if let Some(clock) = self.clock {
                builder = builder.clock(clock);
            }
            let (coordinator, provider) = builder.build()?.into_parts();
            Ok(AsyncDashboardSdk::from_parts(coordinator, provider))
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDashboardSdk
// ---------------------------------------------------------------------------

/// Async counterpart of [`DashboardSdk`].
///
/// Cheap to clone; clones share the same coordinator and provider.
#[derive(Clone)]
pub struct AsyncDashboardSdk {
    coordinator: Arc<Mutex<QueryCoordinator>>,
    provider: Arc<dyn PriceProvider>,
}

impl AsyncDashboardSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncDashboardSdkBuilder {
        AsyncDashboardSdkBuilder::default()
    }

    pub fn from_parts(coordinator: QueryCoordinator, provider: Box<dyn PriceProvider>) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
            provider: Arc::from(provider),
        }
    }

    /// Run a read-only closure against the coordinator.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use crypto_dashboard_sdk::AsyncDashboardSdk;
    /// # async fn example() -> crypto_dashboard_sdk::Result<()> {
    /// # let sdk = AsyncDashboardSdk::builder().build().await?;
    /// let points = sdk.run(|c| c.view().map(|v| v.series.len())).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&QueryCoordinator) -> T,
    {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    pub async fn status(&self) -> Result<Status> {
        self.run(|c| c.status().clone()).await
    }

    // -- Selection inputs --------------------------------------------------

    pub async fn select_asset(&self, asset: Asset) -> Result<Status> {
        let reaction = self.lock()?.select_asset(asset);
        self.dispatch(reaction).await
    }

    pub async fn set_interval(&self, interval: Interval) -> Result<Status> {
        let reaction = self.lock()?.set_interval(interval);
        self.dispatch(reaction).await
    }

    pub async fn set_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Status> {
        let reaction = self.lock()?.set_date_range(start, end)?;
        self.dispatch(reaction).await
    }

    pub async fn set_price_range(&self, min: Option<f64>, max: Option<f64>) -> Result<Status> {
        let reaction = self.lock()?.set_price_range(min, max)?;
        self.dispatch(reaction).await
    }

    pub async fn apply_quick_range(&self, days: u32) -> Result<Status> {
        let reaction = self.lock()?.apply_quick_range(days)?;
        self.dispatch(reaction).await
    }

    pub async fn clear_selection(&self) -> Result<Status> {
        let reaction = self.lock()?.clear_selection();
        self.dispatch(reaction).await
    }

    pub async fn refresh(&self) -> Result<Status> {
        let reaction = self.lock()?.refresh();
        self.dispatch(reaction).await
    }

    // -- Internals ---------------------------------------------------------

    fn lock(&self) -> Result<MutexGuard<'_, QueryCoordinator>> {
        self.coordinator
            .lock()
            .map_err(|_| DashboardError::InvalidArgument("Coordinator lock poisoned".into()))
    }

    async fn dispatch(&self, reaction: Reaction) -> Result<Status> {
        if let Reaction::Fetch(ticket) = reaction {
            let provider = self.provider.clone();
            let request = ticket.request.clone();
            let result = tokio::task::spawn_blocking(move || provider.fetch(&request))
                .await
                .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?;
            let mut guard = self.lock()?;
            guard.complete_fetch(ticket.id, result);
            return Ok(guard.status().clone());
        }
        Ok(self.lock()?.status().clone())
    }
}
