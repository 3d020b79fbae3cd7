//! Integration tests for the REST snapshot client.
//!
//! These tests hit the live Binance futures API and are skipped unless
//! explicitly enabled:
//!
//! ```bash
//! BINANCE_LIVE_TESTS=1 cargo test --test integration_rest
//! ```

use binance_depth::client::rest::RestClient;
use binance_depth::Config;

/// Skip test unless live tests are enabled
macro_rules! require_live {
    () => {
        if std::env::var("BINANCE_LIVE_TESTS").is_err() {
            eprintln!("Skipping test: BINANCE_LIVE_TESTS not set");
            return;
        }
    };
}

#[tokio::test]
async fn test_depth_snapshot() {
    require_live!();

    let config = Config::new("BTCUSD_PERP");
    let client = RestClient::new(&config).unwrap();

    let snapshot = client
        .depth_snapshot(config.symbol(), 100)
        .await
        .expect("snapshot fetch failed");

    assert_eq!(snapshot.symbol, "BTCUSD_PERP");
    assert!(snapshot.last_update_id > 0);
    assert!(!snapshot.bids.is_empty());
    assert!(!snapshot.asks.is_empty());
    assert!(snapshot.bids.len() <= 100);

    // Snapshot comes pre-sorted, best first
    assert!(snapshot
        .bids
        .windows(2)
        .all(|w| w[0].price() >= w[1].price()));
    assert!(snapshot
        .asks
        .windows(2)
        .all(|w| w[0].price() <= w[1].price()));
}

#[tokio::test]
async fn test_invalid_symbol_is_api_error() {
    require_live!();

    let config = Config::new("NOT_A_SYMBOL");
    let client = RestClient::new(&config).unwrap();

    let result = client.depth_snapshot(config.symbol(), 100).await;
    match result {
        Err(binance_depth::Error::Api(e)) => {
            assert!(e.is_client_error(), "expected 4xx, got {}", e.status);
        }
        other => panic!("expected Api error, got {:?}", other.map(|s| s.last_update_id)),
    }
}
