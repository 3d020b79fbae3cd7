//! Stream a live BTCUSD_PERP book and print the top of book once a second.
//!
//! Run with: `cargo run --example live_book`

use std::time::Duration;

use binance_depth::config::UpdateSpeed;
use binance_depth::{Config, DepthFeed};

#[tokio::main]
async fn main() -> binance_depth::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "binance_depth=info".into()),
        )
        .init();

    let config = Config::new("BTCUSD_PERP").with_update_speed(UpdateSpeed::Ms500);
    let feed = DepthFeed::new(config)?;
    let reader = feed.reader();

    let handle = tokio::spawn(feed.run());

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;

        if handle.is_finished() {
            eprintln!("feed terminated");
            break;
        }

        let view = reader.book(5);
        if !reader.is_synced() {
            println!("[{:?}] waiting for sync...", view.sync_state);
            continue;
        }

        let bid = view
            .best_bid()
            .map(|l| format!("{} @ {}", l.quantity(), l.price()))
            .unwrap_or_else(|| "-".into());
        let ask = view
            .best_ask()
            .map(|l| format!("{} @ {}", l.quantity(), l.price()))
            .unwrap_or_else(|| "-".into());

        println!(
            "[{}] bid {} | ask {} | spread {:?}",
            view.last_update_id,
            bid,
            ask,
            view.spread()
        );
    }

    Ok(())
}
