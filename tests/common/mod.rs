//! Shared test fixtures for the dashboard SDK integration tests.
//!
//! Provides a `StubProvider` that serves canned payloads per asset/interval
//! and records every request it receives, plus small sample series.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use crypto_dashboard_sdk::models::{Asset, Interval, PricePoint, Series};
use crypto_dashboard_sdk::{DashboardError, PriceProvider, ProviderRequest, Result};
use serde_json::{json, Value};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn point(y: i32, m: u32, d: u32, open: f64, close: f64) -> PricePoint {
    PricePoint::new(date(y, m, d), open, close)
}

/// The three-day series used throughout the docs.
pub fn three_day_series() -> Series {
    Series::new(
        Asset::Btc,
        Interval::Daily,
        vec![
            point(2024, 1, 1, 10.0, 12.0),
            point(2024, 1, 2, 15.0, 11.0),
            point(2024, 1, 3, 9.0, 9.0),
        ],
    )
}

/// Raw provider payload for [`three_day_series`], in the provider's own
/// field naming (`price` for the close).
pub fn three_day_payload() -> Value {
    json!([
        {"date": "2024-01-01T00:00:00", "open": 10.0, "price": 12.0},
        {"date": "2024-01-02T00:00:00", "open": 15.0, "price": 11.0},
        {"date": "2024-01-03T00:00:00", "open": 9.0, "price": 9.0}
    ])
}

pub fn eth_payload() -> Value {
    json!([
        {"Date": "2024-02-01", "Open": 2300.0, "Close": 2310.5},
        {"Date": "2024-02-02", "Open": 2310.5, "Close": 2290.0}
    ])
}

pub fn weekly_btc_payload() -> Value {
    json!([
        {"date": "2024-01-01", "open": 42000.0, "price": 43000.0},
        {"date": "2024-01-08", "open": 43000.0, "price": 46000.0}
    ])
}

/// Requests seen by a [`StubProvider`], shared with the test body.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<ProviderRequest>>>);

impl CallLog {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<ProviderRequest> {
        self.0.lock().unwrap().last().cloned()
    }

    pub fn all(&self) -> Vec<ProviderRequest> {
        self.0.lock().unwrap().clone()
    }
}

/// Serves canned payloads keyed by asset and interval. Unknown keys fail
/// like an unreachable provider would.
pub struct StubProvider {
    responses: HashMap<(Asset, Interval), Value>,
    calls: CallLog,
}

impl StubProvider {
    pub fn new() -> (Self, CallLog) {
        let calls = CallLog::default();
        (
            Self {
                responses: HashMap::new(),
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn with(mut self, asset: Asset, interval: Interval, payload: Value) -> Self {
        self.responses.insert((asset, interval), payload);
        self
    }

    /// A provider that knows BTC (daily and weekly) and ETH (daily).
    pub fn standard() -> (Self, CallLog) {
        let (stub, calls) = Self::new();
        (
            stub.with(Asset::Btc, Interval::Daily, three_day_payload())
                .with(Asset::Btc, Interval::Weekly, weekly_btc_payload())
                .with(Asset::Eth, Interval::Daily, eth_payload()),
            calls,
        )
    }
}

impl PriceProvider for StubProvider {
    fn fetch(&self, request: &ProviderRequest) -> Result<Value> {
        self.calls.0.lock().unwrap().push(request.clone());
        self.responses
            .get(&(request.asset(), request.interval()))
            .cloned()
            .ok_or_else(|| {
                DashboardError::Fetch(format!(
                    "connection refused for {} {}",
                    request.asset(),
                    request.interval()
                ))
            })
    }
}
