//! Async SDK tests. Run with `cargo test --features async`.

#![cfg(feature = "async")]

mod common;

use std::thread;
use std::time::Duration;

use common::StubProvider;
use crypto_dashboard_sdk::models::{Asset, Interval, Status};
use crypto_dashboard_sdk::{AsyncDashboardSdk, DashboardError, ProviderRequest, Result};
use serde_json::Value;

/// BTC answers slowly, everything else quickly.
fn slow_btc(request: &ProviderRequest) -> Result<Value> {
    match request.asset() {
        Asset::Btc => {
            thread::sleep(Duration::from_millis(300));
            Ok(common::three_day_payload())
        }
        Asset::Eth => Ok(common::eth_payload()),
        other => Err(DashboardError::Fetch(format!("no data for {other}"))),
    }
}

#[tokio::test]
async fn select_and_filter() {
    let (stub, calls) = StubProvider::standard();
    let sdk = AsyncDashboardSdk::builder().provider(stub).build().await.unwrap();

    assert_eq!(sdk.status().await.unwrap(), Status::Idle);
    assert_eq!(sdk.select_asset(Asset::Btc).await.unwrap(), Status::Ready);

    sdk.set_price_range(Some(10.0), Some(12.0)).await.unwrap();
    let closes = sdk
        .run(|c| {
            c.view()
                .map(|v| v.series.iter().map(|p| p.close).collect::<Vec<_>>())
        })
        .await
        .unwrap();
    assert_eq!(closes, Some(vec![12.0, 11.0]));
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn quick_range_uses_the_configured_clock() {
    let (stub, _) = StubProvider::standard();
    let sdk = AsyncDashboardSdk::builder()
        .provider(stub)
        .clock(|| common::date(2024, 1, 3))
        .build()
        .await
        .unwrap();

    sdk.select_asset(Asset::Btc).await.unwrap();
    assert_eq!(sdk.apply_quick_range(1).await.unwrap(), Status::Ready);
    let (start, points) = sdk
        .run(|c| (c.selection().start_date, c.view().map(|v| v.series.len())))
        .await
        .unwrap();
    assert_eq!(start, Some(common::date(2024, 1, 2)));
    assert_eq!(points, Some(2));
}

#[tokio::test]
async fn invalid_range_is_rejected() {
    let (stub, _) = StubProvider::standard();
    let sdk = AsyncDashboardSdk::builder().provider(stub).build().await.unwrap();
    let err = sdk
        .set_date_range(Some(common::date(2024, 2, 1)), Some(common::date(2024, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::InvalidArgument(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn later_selection_wins_over_slower_earlier_one() {
    let sdk = AsyncDashboardSdk::builder().provider(slow_btc).build().await.unwrap();

    let (btc, eth) = tokio::join!(sdk.select_asset(Asset::Btc), sdk.select_asset(Asset::Eth));
    btc.unwrap();
    eth.unwrap();

    let (asset, series_asset) = sdk
        .run(|c| (c.selection().asset, c.view().map(|v| v.series.asset())))
        .await
        .unwrap();
    assert_eq!(asset, Some(Asset::Eth));
    assert_eq!(series_asset, Some(Asset::Eth));
    assert_eq!(sdk.status().await.unwrap(), Status::Ready);
}

#[tokio::test]
async fn clearing_abandons_in_flight_fetch() {
    let sdk = AsyncDashboardSdk::builder().provider(slow_btc).build().await.unwrap();

    let (_, cleared) = tokio::join!(sdk.select_asset(Asset::Btc), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        sdk.clear_selection().await
    });
    assert_eq!(cleared.unwrap(), Status::Idle);
    assert_eq!(sdk.status().await.unwrap(), Status::Idle);
    assert!(sdk.run(|c| c.view().is_none()).await.unwrap());
}

#[tokio::test]
async fn clones_share_state() {
    let (stub, _) = StubProvider::standard();
    let sdk = AsyncDashboardSdk::builder()
        .provider(stub)
        .interval(Interval::Weekly)
        .build()
        .await
        .unwrap();
    let other = sdk.clone();

    sdk.select_asset(Asset::Btc).await.unwrap();
    let interval = other.run(|c| c.view().map(|v| v.series.interval())).await.unwrap();
    assert_eq!(interval, Some(Interval::Weekly));
}
