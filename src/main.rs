//! tidycache - A Concurrency-Safe In-Memory TTL Cache
//!
//! This is a small demonstration entry point. It constructs a cache with a
//! background sweeper, writes a few entries, and then waits either for
//! Ctrl+C or for a demo timeout before tearing everything down.

use bytes::Bytes;
use std::time::Duration;
use tidycache::Cache;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Demo configuration
struct Config {
    /// How often the background sweeper runs
    sweep_interval: Duration,
    /// How long the demo runs before shutting itself down
    run_for: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(2),
            run_for: Duration::from_secs(20),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--sweep-interval" | "-i" => {
                    config.sweep_interval = Duration::from_secs(parse_secs(&args, i));
                    i += 2;
                }
                "--run-for" | "-r" => {
                    config.run_for = Duration::from_secs(parse_secs(&args, i));
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("tidycache version {}", tidycache::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }
}

fn parse_secs(args: &[String], i: usize) -> u64 {
    match args.get(i + 1).map(|v| v.parse()) {
        Some(Ok(secs)) => secs,
        _ => {
            eprintln!("Error: {} requires a number of seconds", args[i]);
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        r#"
tidycache - A Concurrency-Safe In-Memory TTL Cache

USAGE:
    tidycache [OPTIONS]

OPTIONS:
    -i, --sweep-interval <SECS>    Background sweep interval (default: 2)
    -r, --run-for <SECS>           Demo runtime before shutdown (default: 20)
    -v, --version                  Print version information
        --help                     Print this help message
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    // Create the cache and start its background sweeper
    let cache = Cache::with_sweeper(config.sweep_interval);
    info!(
        interval_secs = config.sweep_interval.as_secs(),
        "cache initialized"
    );

    // A long-lived entry that survives the whole demo...
    cache.set(
        "greeting",
        Bytes::from("Just Some Random Value"),
        Duration::from_secs(300),
    );

    // ...and a short-lived one the sweeper will evict along the way.
    cache.set("ephemeral", Bytes::from("soon gone"), Duration::from_secs(5));

    match cache.get("greeting") {
        Some(value) => info!(?value, "value returned from cache"),
        None => info!("could not retrieve value: 'greeting'"),
    }

    // Run until Ctrl+C or the demo timeout, whichever comes first.
    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received");
    };

    tokio::select! {
        _ = tokio::time::sleep(config.run_for) => {
            info!(entries = cache.len(), "demo timeout reached");
        }
        _ = shutdown => {}
    }

    let stats = cache.stats();
    info!(
        gets = stats.get_ops,
        sets = stats.set_ops,
        swept = stats.swept,
        "final statistics"
    );

    // Stop the sweeper and release all entries.
    cache.shutdown();
    info!("Shutdown complete");
    Ok(())
}
