//! Offline provider tests: saved responses on disk, plain and gzipped.

mod common;

use std::fs;
use std::io::Write;
use std::path::Path;

use crypto_dashboard_sdk::models::{Asset, Interval, Status};
use crypto_dashboard_sdk::{
    DashboardError, DashboardSdk, JsonFileProvider, PriceProvider, ProviderRequest,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;

fn write_json(dir: &Path, name: &str, payload: &Value) {
    fs::write(dir.join(name), serde_json::to_vec(payload).unwrap()).unwrap();
}

fn write_gz(dir: &Path, name: &str, payload: &Value) {
    let file = fs::File::create(dir.join(name)).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(&serde_json::to_vec(payload).unwrap())
        .unwrap();
    encoder.finish().unwrap();
}

#[test]
fn file_name_follows_asset_and_interval() {
    let provider = JsonFileProvider::new("/data");
    let req = ProviderRequest::new(Asset::Btc, Interval::Daily);
    assert_eq!(provider.path_for(&req), Path::new("/data/BTC_daily.json"));
    assert_eq!(provider.dir(), Path::new("/data"));
}

#[test]
fn plain_json_is_returned_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "BTC_daily.json", &common::three_day_payload());

    let provider = JsonFileProvider::new(dir.path());
    let payload = provider
        .fetch(&ProviderRequest::new(Asset::Btc, Interval::Daily))
        .unwrap();
    assert_eq!(payload, common::three_day_payload());
}

#[test]
fn gzipped_json_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    write_gz(dir.path(), "ETH_weekly.json.gz", &common::eth_payload());

    let provider = JsonFileProvider::new(dir.path());
    let payload = provider
        .fetch(&ProviderRequest::new(Asset::Eth, Interval::Weekly))
        .unwrap();
    assert_eq!(payload, common::eth_payload());
}

#[test]
fn plain_file_wins_over_gzipped() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "BTC_daily.json", &common::three_day_payload());
    write_gz(dir.path(), "BTC_daily.json.gz", &common::weekly_btc_payload());

    let provider = JsonFileProvider::new(dir.path());
    let payload = provider
        .fetch(&ProviderRequest::new(Asset::Btc, Interval::Daily))
        .unwrap();
    assert_eq!(payload, common::three_day_payload());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonFileProvider::new(dir.path());
    let err = provider
        .fetch(&ProviderRequest::new(Asset::Aave, Interval::Monthly))
        .unwrap_err();
    assert!(matches!(err, DashboardError::NotFound(_)));
    assert!(err.to_string().contains("AAVE"));
}

#[test]
fn corrupt_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("BTC_daily.json"), "[{not json").unwrap();
    let provider = JsonFileProvider::new(dir.path());
    let err = provider
        .fetch(&ProviderRequest::new(Asset::Btc, Interval::Daily))
        .unwrap_err();
    assert!(matches!(err, DashboardError::Json(_)));
}

#[test]
fn sdk_runs_offline_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "BTC_daily.json", &common::three_day_payload());

    let mut sdk = DashboardSdk::builder()
        .offline_dir(dir.path())
        .build()
        .unwrap();
    assert_eq!(sdk.select_asset(Asset::Btc), &Status::Ready);
    assert_eq!(sdk.view().unwrap().series.len(), 3);

    // No saved weekly file: the failure becomes the status.
    let status = sdk.set_interval(Interval::Weekly).clone();
    assert!(matches!(status, Status::Error(ref m) if m.contains("No saved response")));
}
