use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5224/api/CryptoDashboard";
pub const DATA_ENDPOINT: &str = "DataFiltered";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Day counts offered as "last N days" shortcuts.
pub const QUICK_RANGES: [u32; 3] = [7, 30, 90];

/// Epoch values below this are read as seconds, at or above as milliseconds.
pub const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn data_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), DATA_ENDPOINT)
}

/// File name the offline provider looks up for an asset/interval pair,
/// e.g. `BTC_daily.json`.
pub fn offline_file_name(asset: &str, interval: &str) -> String {
    format!("{}_{}.json", asset, interval)
}
