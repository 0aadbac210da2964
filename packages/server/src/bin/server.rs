//! Idobata chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! ```

use clap::Parser;

use idobata_server::{ServerConfig, run};
use idobata_shared::logger::setup_logger;

/// Chat relay server for Idobata.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    // Run the server
    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
