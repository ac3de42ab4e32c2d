//! castbase Server Binary
//!
//! Loads the CSV file and serves the character API over HTTP.

use std::sync::Arc;

use castbase::network::Server;
use castbase::{logging, Config, Engine};
use clap::Parser;

/// castbase Server
#[derive(Parser, Debug)]
#[command(name = "castbase-server")]
#[command(about = "CSV-backed REST API for the character roster")]
#[command(version)]
struct Args {
    /// CSV file to load and rewrite after each mutation
    #[arg(short, long, default_value = "friends_data.csv")]
    data_file: String,

    /// Append-only log file
    #[arg(long, default_value = "friends_analysis.log")]
    log_file: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Default page size for listings
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    per_page: u64,

    /// Reject updates that name unknown fields instead of ignoring them
    #[arg(long)]
    strict_updates: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = Config::builder()
        .data_file(&args.data_file)
        .log_file(&args.log_file)
        .listen_addr(&args.listen)
        .default_per_page(args.per_page)
        .reject_unknown_fields(args.strict_updates)
        .build();

    if let Err(e) = logging::init(&config.log_file, args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!("castbase Server v{}", castbase::VERSION);
    tracing::info!("Data file: {}", args.data_file);
    tracing::info!("Listen address: {}", args.listen);

    // A bad data file leaves the table empty; the server still starts
    let engine = Arc::new(Engine::open(config));
    tracing::info!("Engine initialized with {} records", engine.len());

    let server = Server::new(engine);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
