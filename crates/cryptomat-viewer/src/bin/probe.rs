//! Command-line probe against a live exchange: connectivity, latest close
//! price and windowed % change.

use std::process::ExitCode;

use clap::Parser;

use cryptomat_core::{BinanceClient, BinanceConfig, ExchangeClient, KlineParams};
use cryptomat_viewer::init_tracing;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trading pair to query
    #[arg(short, long, default_value = "BTCUSDT")]
    symbol: String,

    /// Candlestick interval for the change window
    #[arg(short, long, default_value = "1h")]
    interval: String,

    /// Number of candlesticks in the change window
    #[arg(short, long, default_value_t = 24)]
    duration: u32,

    /// Override the exchange base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing("warn");

    let args = Args::parse();

    let mut config = BinanceConfig::from_env();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let client = BinanceClient::from_config(config);

    let mut failed = false;

    let connected = client.test_connection().await;
    println!("connection: {}", if connected { "ok" } else { "unavailable" });
    failed |= !connected;

    match client.get_latest_close_price(&args.symbol, &KlineParams::default()).await {
        Ok(price) => println!("{} close: {price}", args.symbol),
        Err(e) => {
            eprintln!("{} close: {e}", args.symbol);
            failed = true;
        }
    }

    match client.get_change(&args.symbol, &args.interval, args.duration).await {
        Ok(change) => println!("{} change over {} x {}: {change:+.2}%", args.symbol, args.duration, args.interval),
        Err(e) => {
            eprintln!("{} change: {e}", args.symbol);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
